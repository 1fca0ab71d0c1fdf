//! Driving port for allocating stock to users.

use async_trait::async_trait;

use crate::domain::{Allocation, AllocationRequest, Error};

/// Domain use-case port for the create-or-increment allocation operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AllocationCommand: Send + Sync {
    /// Allocate stock, merging into any existing allocation for the pair.
    async fn allocate(&self, request: AllocationRequest) -> Result<Allocation, Error>;
}
