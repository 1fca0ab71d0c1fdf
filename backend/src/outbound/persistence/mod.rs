//! PostgreSQL adapters for the user, inventory and allocation ports.
//!
//! Tables are declared in `schema.rs` and mapped to row structs in
//! `models.rs`; neither leaves this module. Repositories share one
//! [`DbPool`] and translate Diesel and pool failures into the port error
//! enums. Allocation runs its stock check, decrement and merge in a single
//! transaction.
//!
//! ```no_run
//! use inventory_backend::outbound::persistence::{
//!     DbPool, DieselInventoryRepository, PoolConfig, run_pending_migrations,
//! };
//!
//! # async fn connect() -> Result<(), Box<dyn std::error::Error>> {
//! let url = "postgres://inventory@localhost/inventory";
//! run_pending_migrations(url).await?;
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let items = DieselInventoryRepository::new(pool);
//! # Ok(())
//! # }
//! ```

mod diesel_allocation_repository;
mod diesel_basic_error_mapping;
mod diesel_inventory_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_allocation_repository::DieselAllocationRepository;
pub use diesel_inventory_repository::DieselInventoryRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
