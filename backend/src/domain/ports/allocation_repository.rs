//! Port for the allocation ledger.
//!
//! Allocating stock is a single port call so adapters can run the stock check,
//! the ledger merge and the stock decrement inside one transaction.

use async_trait::async_trait;

use crate::domain::{Allocation, AllocationRequest, HoldingRow, InventoryItemId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by allocation repository adapters.
    pub enum AllocationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "allocation repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "allocation repository query failed: {message}",
        /// The item is unknown or holds less stock than requested.
        InsufficientStock { inventory_id: i32 } =>
            "not enough stock available for inventory item {inventory_id}",
        /// The target user does not exist.
        UnknownUser { user_id: i32 } => "user {user_id} does not exist",
    }
}

/// Port for ledger reads and the transactional allocate operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AllocationRepository: Send + Sync {
    /// Fetch the allocation for a (user, item) pair.
    async fn find(
        &self,
        user_id: UserId,
        inventory_id: InventoryItemId,
    ) -> Result<Option<Allocation>, AllocationRepositoryError>;

    /// Atomically check stock, merge or create the allocation, and decrement
    /// the item's quantity. Nothing is written when any step fails.
    async fn allocate(
        &self,
        request: &AllocationRequest,
    ) -> Result<Allocation, AllocationRepositoryError>;

    /// Allocation rows for a user joined with their still-existing items.
    async fn holdings_for(&self, user_id: UserId)
    -> Result<Vec<HoldingRow>, AllocationRepositoryError>;
}
