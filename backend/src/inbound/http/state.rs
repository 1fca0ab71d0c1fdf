//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AllocationCommand, AllocationQuery, AllocationRepository, CredentialHasher, InventoryCommand,
    InventoryQuery, InventoryRepository, LoginService, RegistrationService, SessionRegistry,
    UserRepository, UsersQuery,
};
use crate::domain::{
    AllocationCommandService, AllocationQueryService, IdentityService, InventoryCommandService,
    InventoryQueryService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub users: Arc<dyn UsersQuery>,
    pub inventory: Arc<dyn InventoryCommand>,
    pub inventory_query: Arc<dyn InventoryQuery>,
    pub allocations: Arc<dyn AllocationCommand>,
    pub allocations_query: Arc<dyn AllocationQuery>,
    pub sessions: Arc<dyn SessionRegistry>,
}

/// Driven adapters from which [`HttpState`] wires the domain services.
pub struct HttpStateAdapters<U, I, A, H> {
    pub users: Arc<U>,
    pub inventory: Arc<I>,
    pub allocations: Arc<A>,
    pub hasher: Arc<H>,
    pub sessions: Arc<dyn SessionRegistry>,
}

impl HttpState {
    /// Build every driving port from one set of driven adapters.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use inventory_backend::inbound::http::state::{HttpState, HttpStateAdapters};
    /// use inventory_backend::outbound::memory::InMemoryStore;
    /// use inventory_backend::outbound::security::Argon2CredentialHasher;
    /// use inventory_backend::outbound::sessions::InMemorySessionRegistry;
    ///
    /// let store = Arc::new(InMemoryStore::default());
    /// let state = HttpState::from_adapters(HttpStateAdapters {
    ///     users: store.clone(),
    ///     inventory: store.clone(),
    ///     allocations: store,
    ///     hasher: Arc::new(Argon2CredentialHasher::new()),
    ///     sessions: Arc::new(InMemorySessionRegistry::default()),
    /// });
    /// ```
    pub fn from_adapters<U, I, A, H>(adapters: HttpStateAdapters<U, I, A, H>) -> Self
    where
        U: UserRepository + 'static,
        I: InventoryRepository + 'static,
        A: AllocationRepository + 'static,
        H: CredentialHasher + 'static,
    {
        let HttpStateAdapters {
            users,
            inventory,
            allocations,
            hasher,
            sessions,
        } = adapters;
        let identity = Arc::new(IdentityService::new(users.clone(), hasher));
        Self {
            login: identity.clone(),
            registration: identity.clone(),
            users: identity,
            inventory: Arc::new(InventoryCommandService::new(inventory.clone())),
            inventory_query: Arc::new(InventoryQueryService::new(
                inventory,
                allocations.clone(),
            )),
            allocations: Arc::new(AllocationCommandService::new(allocations.clone(), users)),
            allocations_query: Arc::new(AllocationQueryService::new(allocations)),
            sessions,
        }
    }
}
