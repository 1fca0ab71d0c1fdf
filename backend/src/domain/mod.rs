//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, the ports that separate them, and the services that
//! implement the use-cases. Keep types immutable and validate at
//! construction.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User, Username, UserId: identity store records.
//! - InventoryItem and its value types: catalogue records.
//! - Allocation, AllocationRequest: ledger records.
//! - Services implementing the driving ports in [`ports`].

pub mod allocation;
pub mod allocation_service;
pub mod auth;
pub mod error;
pub mod identity_service;
pub mod inventory;
pub mod inventory_service;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::allocation::{
    Allocation, AllocationId, AllocationQuantity, AllocationRequest, AllocationValidationError,
};
pub use self::allocation_service::{AllocationCommandService, AllocationQueryService};
pub use self::auth::{
    CredentialValidationError, LoginCredentials, Registration, SessionPrincipal, SessionToken,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity_service::{AdminBootstrap, IdentityService};
pub use self::inventory::{
    Holding, HoldingRow, ITEM_NAME_MAX, InventoryItem, InventoryItemId, InventoryItemPatch,
    InventorySummary, InventoryValidationError, ItemName, NewInventoryItem, StockQuantity,
    UnitPrice, aggregate_holdings,
};
pub use self::inventory_service::{InventoryCommandService, InventoryQueryService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    NewUser, PasswordHash, StoredUser, USERNAME_MAX, User, UserId, UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use inventory_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
