//! Driving port for catalogue reads.

use async_trait::async_trait;

use crate::domain::{Error, Holding, InventoryItem, InventorySummary, UserId};

/// Domain use-case port for catalogue and holdings projections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryQuery: Send + Sync {
    /// Every catalogue item ordered by id.
    async fn list_items(&self) -> Result<Vec<InventoryItem>, Error>;

    /// Item count and total stock value.
    async fn summary(&self) -> Result<InventorySummary, Error>;

    /// What the given user holds, one entry per item.
    async fn holdings_for(&self, user_id: UserId) -> Result<Vec<Holding>, Error>;
}
