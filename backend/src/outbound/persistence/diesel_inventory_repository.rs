//! PostgreSQL-backed `InventoryRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{InventoryRepository, InventoryRepositoryError};
use crate::domain::{
    InventoryItem, InventoryItemId, InventoryItemPatch, InventoryValidationError, ItemName,
    NewInventoryItem, StockQuantity, UnitPrice,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{InventoryChangeset, InventoryRow, NewInventoryRow};
use super::pool::{DbPool, PoolError};
use super::schema::inventory;

/// Diesel-backed implementation of the catalogue store.
#[derive(Clone)]
pub struct DieselInventoryRepository {
    pool: DbPool,
}

impl DieselInventoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> InventoryRepositoryError {
    map_basic_pool_error(error, InventoryRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> InventoryRepositoryError {
    map_basic_diesel_error(
        error,
        InventoryRepositoryError::query,
        InventoryRepositoryError::connection,
    )
}

pub(super) fn row_to_item(row: InventoryRow) -> Result<InventoryItem, InventoryRepositoryError> {
    let invalid = |err: InventoryValidationError| {
        InventoryRepositoryError::query(format!("stored item {} invalid: {err}", row.id))
    };
    Ok(InventoryItem {
        id: InventoryItemId::new(row.id).map_err(invalid)?,
        name: ItemName::new(&row.name).map_err(invalid)?,
        quantity: StockQuantity::new(row.quantity).map_err(invalid)?,
        price: UnitPrice::new(row.price).map_err(invalid)?,
    })
}

#[async_trait]
impl InventoryRepository for DieselInventoryRepository {
    async fn list(&self) -> Result<Vec<InventoryItem>, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<InventoryRow> = inventory::table
            .order(inventory::id.asc())
            .select(InventoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_item).collect()
    }

    async fn find_by_id(
        &self,
        id: InventoryItemId,
    ) -> Result<Option<InventoryItem>, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<InventoryRow> = inventory::table
            .find(id.get())
            .select(InventoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_item).transpose()
    }

    async fn insert(
        &self,
        item: &NewInventoryItem,
    ) -> Result<InventoryItem, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewInventoryRow {
            name: item.name.as_ref(),
            quantity: item.quantity.get(),
            price: item.price.get(),
        };

        let row: InventoryRow = diesel::insert_into(inventory::table)
            .values(&new_row)
            .returning(InventoryRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_item(row)
    }

    async fn update(
        &self,
        id: InventoryItemId,
        patch: &InventoryItemPatch,
    ) -> Result<Option<InventoryItem>, InventoryRepositoryError> {
        // Diesel rejects an empty changeset.
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = InventoryChangeset {
            name: patch.name.as_ref().map(AsRef::as_ref),
            quantity: patch.quantity.map(StockQuantity::get),
            price: patch.price.map(UnitPrice::get),
        };

        let row: Option<InventoryRow> = diesel::update(inventory::table.find(id.get()))
            .set(&changeset)
            .returning(InventoryRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_item).transpose()
    }

    async fn delete(&self, id: InventoryItemId) -> Result<bool, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(inventory::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}
