//! Port for catalogue persistence.

use async_trait::async_trait;

use crate::domain::{InventoryItem, InventoryItemId, InventoryItemPatch, NewInventoryItem};

use super::define_port_error;

define_port_error! {
    /// Errors raised by inventory repository adapters.
    pub enum InventoryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "inventory repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "inventory repository query failed: {message}",
    }
}

/// Port for reading and editing catalogue items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// List all items ordered by id.
    async fn list(&self) -> Result<Vec<InventoryItem>, InventoryRepositoryError>;

    /// Fetch a single item.
    async fn find_by_id(
        &self,
        id: InventoryItemId,
    ) -> Result<Option<InventoryItem>, InventoryRepositoryError>;

    /// Insert an item and return it with its assigned id.
    async fn insert(&self, item: &NewInventoryItem)
    -> Result<InventoryItem, InventoryRepositoryError>;

    /// Apply a partial update; `None` when the item does not exist.
    async fn update(
        &self,
        id: InventoryItemId,
        patch: &InventoryItemPatch,
    ) -> Result<Option<InventoryItem>, InventoryRepositoryError>;

    /// Delete an item, returning whether it existed.
    ///
    /// Allocations referencing the item are left in place with their item
    /// reference cleared.
    async fn delete(&self, id: InventoryItemId) -> Result<bool, InventoryRepositoryError>;
}
