//! Driving port for catalogue mutations.

use async_trait::async_trait;

use crate::domain::{Error, InventoryItem, InventoryItemId, InventoryItemPatch, NewInventoryItem};

/// Domain use-case port for adding, editing and removing catalogue items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryCommand: Send + Sync {
    /// Add an item to the catalogue.
    async fn add_item(&self, item: NewInventoryItem) -> Result<InventoryItem, Error>;

    /// Partially update an item. Fails with not-found for unknown ids.
    async fn update_item(
        &self,
        id: InventoryItemId,
        patch: InventoryItemPatch,
    ) -> Result<InventoryItem, Error>;

    /// Remove an item. Existing allocations are not consulted.
    async fn delete_item(&self, id: InventoryItemId) -> Result<(), Error>;
}
