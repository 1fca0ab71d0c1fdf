//! Assemble [`HttpState`] from the configured driven adapters.

use std::sync::Arc;

use inventory_backend::domain::ports::{
    AllocationRepository, CredentialHasher, InventoryRepository, UserRepository,
};
use inventory_backend::domain::{AdminBootstrap, Error, IdentityService};
use inventory_backend::inbound::http::state::{HttpState, HttpStateAdapters};
use inventory_backend::outbound::memory::InMemoryStore;
use inventory_backend::outbound::persistence::{
    DbPool, DieselAllocationRepository, DieselInventoryRepository, DieselUserRepository,
};
use inventory_backend::outbound::security::Argon2CredentialHasher;
use inventory_backend::outbound::sessions::InMemorySessionRegistry;
use tracing::{info, warn};

use super::config::{AdminCredentials, ServerConfig};

/// Build the handler state, seeding the admin account first.
///
/// PostgreSQL repositories are used when a pool is configured; otherwise all
/// data lives in process memory and is lost on restart.
pub(super) async fn build_http_state(config: &ServerConfig) -> Result<HttpState, Error> {
    let hasher = Arc::new(Argon2CredentialHasher::new());
    match &config.db_pool {
        Some(pool) => {
            let (users, inventory, allocations) = diesel_adapters(pool);
            wire(users, inventory, allocations, hasher, &config.admin).await
        }
        None => {
            warn!("no database configured; using the in-memory store");
            let store = Arc::new(InMemoryStore::default());
            wire(store.clone(), store.clone(), store, hasher, &config.admin).await
        }
    }
}

fn diesel_adapters(
    pool: &DbPool,
) -> (
    Arc<DieselUserRepository>,
    Arc<DieselInventoryRepository>,
    Arc<DieselAllocationRepository>,
) {
    (
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselInventoryRepository::new(pool.clone())),
        Arc::new(DieselAllocationRepository::new(pool.clone())),
    )
}

async fn wire<U, I, A, H>(
    users: Arc<U>,
    inventory: Arc<I>,
    allocations: Arc<A>,
    hasher: Arc<H>,
    admin: &AdminCredentials,
) -> Result<HttpState, Error>
where
    U: UserRepository + 'static,
    I: InventoryRepository + 'static,
    A: AllocationRepository + 'static,
    H: CredentialHasher + 'static,
{
    seed_admin(&IdentityService::new(users.clone(), hasher.clone()), admin).await?;
    Ok(HttpState::from_adapters(HttpStateAdapters {
        users,
        inventory,
        allocations,
        hasher,
        sessions: Arc::new(InMemorySessionRegistry::default()),
    }))
}

async fn seed_admin<U, H>(
    identity: &IdentityService<U, H>,
    admin: &AdminCredentials,
) -> Result<(), Error>
where
    U: UserRepository,
    H: CredentialHasher,
{
    match identity
        .bootstrap_admin(&admin.username, admin.password.as_str())
        .await?
    {
        AdminBootstrap::Created => info!(username = %admin.username, "admin account created"),
        AdminBootstrap::AlreadyPresent => {
            info!(username = %admin.username, "admin account already present");
        }
    }
    Ok(())
}
