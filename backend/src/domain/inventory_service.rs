//! Inventory catalogue domain services.
//!
//! The command side edits the catalogue. The query side reads it and projects
//! per-user holdings from the allocation ledger.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    AllocationRepository, AllocationRepositoryError, InventoryCommand, InventoryQuery,
    InventoryRepository, InventoryRepositoryError,
};
use crate::domain::{
    Error, Holding, InventoryItem, InventoryItemId, InventoryItemPatch, InventorySummary,
    NewInventoryItem, UserId, aggregate_holdings,
};

pub(crate) const ITEM_NOT_FOUND: &str = "Item not found";

fn map_inventory_error(error: InventoryRepositoryError) -> Error {
    match error {
        InventoryRepositoryError::Connection { message } => {
            Error::internal(format!("inventory repository unavailable: {message}"))
        }
        InventoryRepositoryError::Query { message } => {
            Error::internal(format!("inventory repository error: {message}"))
        }
    }
}

fn map_ledger_error(error: AllocationRepositoryError) -> Error {
    Error::internal(format!("allocation ledger error: {error}"))
}

/// Catalogue service implementing the inventory command driving port.
#[derive(Clone)]
pub struct InventoryCommandService<R> {
    inventory_repo: Arc<R>,
}

impl<R> InventoryCommandService<R> {
    /// Create a new command service with the inventory repository.
    pub fn new(inventory_repo: Arc<R>) -> Self {
        Self { inventory_repo }
    }
}

#[async_trait]
impl<R> InventoryCommand for InventoryCommandService<R>
where
    R: InventoryRepository,
{
    async fn add_item(&self, item: NewInventoryItem) -> Result<InventoryItem, Error> {
        let created = self
            .inventory_repo
            .insert(&item)
            .await
            .map_err(map_inventory_error)?;
        info!(item_id = %created.id, "inventory item added");
        Ok(created)
    }

    async fn update_item(
        &self,
        id: InventoryItemId,
        patch: InventoryItemPatch,
    ) -> Result<InventoryItem, Error> {
        let updated = self
            .inventory_repo
            .update(id, &patch)
            .await
            .map_err(map_inventory_error)?
            .ok_or_else(|| Error::not_found(ITEM_NOT_FOUND))?;
        info!(item_id = %id, "inventory item updated");
        Ok(updated)
    }

    async fn delete_item(&self, id: InventoryItemId) -> Result<(), Error> {
        let existed = self
            .inventory_repo
            .delete(id)
            .await
            .map_err(map_inventory_error)?;
        if !existed {
            return Err(Error::not_found(ITEM_NOT_FOUND));
        }
        info!(item_id = %id, "inventory item deleted");
        Ok(())
    }
}

/// Catalogue service implementing the inventory query driving port.
#[derive(Clone)]
pub struct InventoryQueryService<R, A> {
    inventory_repo: Arc<R>,
    allocation_repo: Arc<A>,
}

impl<R, A> InventoryQueryService<R, A> {
    /// Create a new query service over the catalogue and the ledger.
    pub fn new(inventory_repo: Arc<R>, allocation_repo: Arc<A>) -> Self {
        Self {
            inventory_repo,
            allocation_repo,
        }
    }
}

#[async_trait]
impl<R, A> InventoryQuery for InventoryQueryService<R, A>
where
    R: InventoryRepository,
    A: AllocationRepository,
{
    async fn list_items(&self) -> Result<Vec<InventoryItem>, Error> {
        self.inventory_repo.list().await.map_err(map_inventory_error)
    }

    async fn summary(&self) -> Result<InventorySummary, Error> {
        let items = self.list_items().await?;
        Ok(InventorySummary::from_items(&items))
    }

    async fn holdings_for(&self, user_id: UserId) -> Result<Vec<Holding>, Error> {
        let rows = self
            .allocation_repo
            .holdings_for(user_id)
            .await
            .map_err(map_ledger_error)?;
        Ok(aggregate_holdings(rows))
    }
}

#[cfg(test)]
#[path = "inventory_service_tests.rs"]
mod tests;
