//! Allocation ledger model.
//!
//! An allocation assigns a quantity of one catalogue item to one user. At most
//! one allocation exists per (user, item) pair; repeat requests increase the
//! existing quantity. Allocations only ever grow.

use std::fmt;

use chrono::{DateTime, Utc};

use super::{InventoryItemId, UserId};

/// Validation errors returned by the allocation constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationValidationError {
    /// Identifier was zero or negative.
    NonPositiveId,
    /// Allocated quantity was zero or negative.
    NonPositiveQuantity,
}

impl fmt::Display for AllocationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveId => write!(f, "allocation id must be a positive integer"),
            Self::NonPositiveQuantity => write!(f, "quantity must be greater than zero"),
        }
    }
}

impl std::error::Error for AllocationValidationError {}

/// Stable allocation identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AllocationId(i32);

impl AllocationId {
    /// Validate and construct an [`AllocationId`].
    pub fn new(id: i32) -> Result<Self, AllocationValidationError> {
        if id <= 0 {
            return Err(AllocationValidationError::NonPositiveId);
        }
        Ok(Self(id))
    }

    /// Raw integer value as stored.
    pub fn get(self) -> i32 {
        self.0
    }
}

/// Quantity assigned by an allocation; always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AllocationQuantity(i32);

impl AllocationQuantity {
    /// Validate and construct an [`AllocationQuantity`].
    pub fn new(quantity: i32) -> Result<Self, AllocationValidationError> {
        if quantity <= 0 {
            return Err(AllocationValidationError::NonPositiveQuantity);
        }
        Ok(Self(quantity))
    }

    /// Raw integer value as stored.
    pub fn get(self) -> i32 {
        self.0
    }
}

/// Ledger entry for one (user, item) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// Store-assigned identifier.
    pub id: AllocationId,
    /// User holding the stock.
    pub user_id: UserId,
    /// Catalogue item the stock was drawn from.
    pub inventory_id: InventoryItemId,
    /// Total quantity allocated so far.
    pub quantity: AllocationQuantity,
    /// When the allocation was first recorded.
    pub allocated_at: DateTime<Utc>,
}

/// Request to create or grow the allocation for a (user, item) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationRequest {
    /// User receiving the stock.
    pub user_id: UserId,
    /// Catalogue item to draw from.
    pub inventory_id: InventoryItemId,
    /// Quantity to move from stock into the allocation.
    pub quantity: AllocationQuantity,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(-3)]
    fn quantity_must_be_positive(#[case] raw: i32) {
        assert_eq!(
            AllocationQuantity::new(raw),
            Err(AllocationValidationError::NonPositiveQuantity)
        );
    }

    #[rstest]
    fn quantity_accepts_positive() {
        assert_eq!(AllocationQuantity::new(4).map(AllocationQuantity::get), Ok(4));
    }

    #[rstest]
    fn id_must_be_positive() {
        assert_eq!(AllocationId::new(0), Err(AllocationValidationError::NonPositiveId));
    }
}
