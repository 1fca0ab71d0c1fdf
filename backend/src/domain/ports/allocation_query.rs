//! Driving port for allocation lookups.

use async_trait::async_trait;

use crate::domain::{Allocation, Error, InventoryItemId, UserId};

/// Domain use-case port for reading the ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AllocationQuery: Send + Sync {
    /// Find the allocation for a (user, item) pair; not-found when absent.
    async fn find_allocation(
        &self,
        user_id: UserId,
        inventory_id: InventoryItemId,
    ) -> Result<Allocation, Error>;
}
