//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`CredentialHasher`], [`SessionRegistry`]) are
//! implemented by outbound adapters. Driving ports (`*Command`, `*Query`,
//! [`LoginService`], [`RegistrationService`]) are implemented by domain
//! services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod allocation_command;
mod allocation_query;
mod allocation_repository;
mod credential_hasher;
mod inventory_command;
mod inventory_query;
mod inventory_repository;
mod login_service;
mod registration_service;
mod session_registry;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use allocation_command::MockAllocationCommand;
pub use allocation_command::AllocationCommand;
#[cfg(test)]
pub use allocation_query::MockAllocationQuery;
pub use allocation_query::AllocationQuery;
#[cfg(test)]
pub use allocation_repository::MockAllocationRepository;
pub use allocation_repository::{AllocationRepository, AllocationRepositoryError};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHashError, CredentialHasher};
#[cfg(test)]
pub use inventory_command::MockInventoryCommand;
pub use inventory_command::InventoryCommand;
#[cfg(test)]
pub use inventory_query::MockInventoryQuery;
pub use inventory_query::InventoryQuery;
#[cfg(test)]
pub use inventory_repository::MockInventoryRepository;
pub use inventory_repository::{InventoryRepository, InventoryRepositoryError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use registration_service::MockRegistrationService;
pub use registration_service::RegistrationService;
#[cfg(test)]
pub use session_registry::MockSessionRegistry;
pub use session_registry::{SessionRegistry, SessionRegistryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;

#[cfg(test)]
mod tests;
