//! Allocation ledger domain services.
//!
//! The command service validates the target user and delegates the
//! check-merge-decrement sequence to the repository, which runs it as one
//! transaction. The query service reads single ledger entries.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    AllocationCommand, AllocationQuery, AllocationRepository, AllocationRepositoryError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{Allocation, AllocationRequest, Error, InventoryItemId, UserId};

pub(crate) const NOT_ENOUGH_STOCK: &str = "Not enough stock available";
pub(crate) const ALLOCATION_NOT_FOUND: &str = "Allocation not found";
const UNKNOWN_USER: &str = "User does not exist";

fn map_ledger_error(error: AllocationRepositoryError) -> Error {
    match error {
        AllocationRepositoryError::InsufficientStock { .. } => {
            Error::insufficient_stock(NOT_ENOUGH_STOCK)
        }
        AllocationRepositoryError::UnknownUser { .. } => Error::invalid_request(UNKNOWN_USER),
        AllocationRepositoryError::Connection { message } => {
            Error::internal(format!("allocation ledger unavailable: {message}"))
        }
        AllocationRepositoryError::Query { message } => {
            Error::internal(format!("allocation ledger error: {message}"))
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    Error::internal(format!("user repository error: {error}"))
}

/// Ledger service implementing the allocation command driving port.
#[derive(Clone)]
pub struct AllocationCommandService<A, U> {
    allocation_repo: Arc<A>,
    user_repo: Arc<U>,
}

impl<A, U> AllocationCommandService<A, U> {
    /// Create a new command service over the ledger and the identity store.
    pub fn new(allocation_repo: Arc<A>, user_repo: Arc<U>) -> Self {
        Self {
            allocation_repo,
            user_repo,
        }
    }
}

#[async_trait]
impl<A, U> AllocationCommand for AllocationCommandService<A, U>
where
    A: AllocationRepository,
    U: UserRepository,
{
    async fn allocate(&self, request: AllocationRequest) -> Result<Allocation, Error> {
        if self
            .user_repo
            .find_by_id(request.user_id)
            .await
            .map_err(map_user_error)?
            .is_none()
        {
            return Err(Error::invalid_request(UNKNOWN_USER));
        }

        let allocation = self
            .allocation_repo
            .allocate(&request)
            .await
            .map_err(|err| {
                if matches!(err, AllocationRepositoryError::InsufficientStock { .. }) {
                    warn!(
                        user_id = %request.user_id,
                        inventory_id = %request.inventory_id,
                        requested = request.quantity.get(),
                        "allocation rejected: not enough stock"
                    );
                }
                map_ledger_error(err)
            })?;

        info!(
            allocation_id = allocation.id.get(),
            user_id = %request.user_id,
            inventory_id = %request.inventory_id,
            quantity = allocation.quantity.get(),
            "stock allocated"
        );
        Ok(allocation)
    }
}

/// Ledger service implementing the allocation query driving port.
#[derive(Clone)]
pub struct AllocationQueryService<A> {
    allocation_repo: Arc<A>,
}

impl<A> AllocationQueryService<A> {
    /// Create a new query service with the allocation repository.
    pub fn new(allocation_repo: Arc<A>) -> Self {
        Self { allocation_repo }
    }
}

#[async_trait]
impl<A> AllocationQuery for AllocationQueryService<A>
where
    A: AllocationRepository,
{
    async fn find_allocation(
        &self,
        user_id: UserId,
        inventory_id: InventoryItemId,
    ) -> Result<Allocation, Error> {
        self.allocation_repo
            .find(user_id, inventory_id)
            .await
            .map_err(map_ledger_error)?
            .ok_or_else(|| Error::not_found(ALLOCATION_NOT_FOUND))
    }
}

#[cfg(test)]
#[path = "allocation_service_tests.rs"]
mod tests;
