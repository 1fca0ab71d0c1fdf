//! PostgreSQL-backed `AllocationRepository` implementation using Diesel ORM.
//!
//! Allocation runs in one transaction: a conditional decrement of the item's
//! stock (`quantity >= requested`) followed by an upsert on the
//! `(user_id, inventory_id)` unique constraint. The row lock taken by the
//! decrement serialises concurrent allocations of the same item, so stock can
//! never be overdrawn.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{AllocationRepository, AllocationRepositoryError};
use crate::domain::{
    Allocation, AllocationId, AllocationQuantity, AllocationRequest, HoldingRow,
    InventoryItemId, ItemName, UnitPrice, UserId,
};

use super::diesel_basic_error_mapping::{
    is_foreign_key_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{AllocationRow, NewAllocationRow};
use super::pool::{DbPool, PoolError};
use super::schema::{allocations, inventory};

/// Diesel-backed implementation of the allocation ledger.
#[derive(Clone)]
pub struct DieselAllocationRepository {
    pool: DbPool,
}

impl DieselAllocationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure raised inside the allocation transaction.
#[derive(Debug)]
enum AllocateError {
    InsufficientStock,
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for AllocateError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

fn map_pool_error(error: PoolError) -> AllocationRepositoryError {
    map_basic_pool_error(error, AllocationRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AllocationRepositoryError {
    map_basic_diesel_error(
        error,
        AllocationRepositoryError::query,
        AllocationRepositoryError::connection,
    )
}

fn row_to_allocation(row: AllocationRow) -> Result<Allocation, AllocationRepositoryError> {
    let corrupt = |detail: String| {
        AllocationRepositoryError::query(format!("stored allocation {} invalid: {detail}", row.id))
    };
    let inventory_id = row
        .inventory_id
        .ok_or_else(|| corrupt("item reference cleared".to_owned()))?;
    Ok(Allocation {
        id: AllocationId::new(row.id).map_err(|err| corrupt(err.to_string()))?,
        user_id: UserId::new(row.user_id).map_err(|err| corrupt(err.to_string()))?,
        inventory_id: InventoryItemId::new(inventory_id).map_err(|err| corrupt(err.to_string()))?,
        quantity: AllocationQuantity::new(row.quantity).map_err(|err| corrupt(err.to_string()))?,
        allocated_at: row.allocation_date,
    })
}

fn tuple_to_holding(
    (item_id, name, price, allocated): (i32, String, f64, i32),
) -> Result<HoldingRow, AllocationRepositoryError> {
    let corrupt = |detail: String| {
        AllocationRepositoryError::query(format!("stored holding for item {item_id} invalid: {detail}"))
    };
    Ok(HoldingRow {
        item_id: InventoryItemId::new(item_id).map_err(|err| corrupt(err.to_string()))?,
        name: ItemName::new(&name).map_err(|err| corrupt(err.to_string()))?,
        price: UnitPrice::new(price).map_err(|err| corrupt(err.to_string()))?,
        allocated,
    })
}

#[async_trait]
impl AllocationRepository for DieselAllocationRepository {
    async fn find(
        &self,
        user_id: UserId,
        inventory_id: InventoryItemId,
    ) -> Result<Option<Allocation>, AllocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<AllocationRow> = allocations::table
            .filter(allocations::user_id.eq(user_id.get()))
            .filter(allocations::inventory_id.eq(inventory_id.get()))
            .select(AllocationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_allocation).transpose()
    }

    async fn allocate(
        &self,
        request: &AllocationRequest,
    ) -> Result<Allocation, AllocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let user_id = request.user_id.get();
        let item_id = request.inventory_id.get();
        let quantity = request.quantity.get();

        let result = conn
            .transaction::<AllocationRow, AllocateError, _>(|conn| {
                async move {
                    let decremented = diesel::update(
                        inventory::table
                            .filter(inventory::id.eq(item_id))
                            .filter(inventory::quantity.ge(quantity)),
                    )
                    .set(inventory::quantity.eq(inventory::quantity - quantity))
                    .execute(conn)
                    .await?;

                    if decremented == 0 {
                        return Err(AllocateError::InsufficientStock);
                    }

                    let row = diesel::insert_into(allocations::table)
                        .values(&NewAllocationRow {
                            user_id,
                            inventory_id: item_id,
                            quantity,
                        })
                        .on_conflict((allocations::user_id, allocations::inventory_id))
                        .do_update()
                        .set(
                            allocations::quantity
                                .eq(allocations::quantity + excluded(allocations::quantity)),
                        )
                        .returning(AllocationRow::as_returning())
                        .get_result(conn)
                        .await?;

                    Ok(row)
                }
                .scope_boxed()
            })
            .await;

        match result {
            Ok(row) => row_to_allocation(row),
            Err(AllocateError::InsufficientStock) => {
                Err(AllocationRepositoryError::insufficient_stock(item_id))
            }
            Err(AllocateError::Diesel(err)) if is_foreign_key_violation(&err) => {
                Err(AllocationRepositoryError::unknown_user(user_id))
            }
            Err(AllocateError::Diesel(err)) => Err(map_diesel_error(err)),
        }
    }

    async fn holdings_for(
        &self,
        user_id: UserId,
    ) -> Result<Vec<HoldingRow>, AllocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // The inner join drops allocations whose item has been deleted.
        let rows: Vec<(i32, String, f64, i32)> = allocations::table
            .inner_join(inventory::table)
            .filter(allocations::user_id.eq(user_id.get()))
            .order(inventory::id.asc())
            .select((
                inventory::id,
                inventory::name,
                inventory::price,
                allocations::quantity,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(tuple_to_holding).collect()
    }
}
