//! Identity domain service.
//!
//! Implements the login, registration and user listing driving ports on top
//! of the user repository and credential hasher, and seeds the bootstrap
//! admin account at startup.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    CredentialHashError, CredentialHasher, LoginService, RegistrationService,
    UserPersistenceError, UserRepository, UsersQuery,
};
use crate::domain::{
    Error, LoginCredentials, NewUser, Registration, SessionPrincipal, User, Username,
};

pub(crate) const INVALID_CREDENTIALS: &str = "Invalid username or password";
const USER_EXISTS: &str = "User already exists";

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::DuplicateUsername { .. } => Error::conflict(USER_EXISTS),
        UserPersistenceError::Connection { message } => {
            Error::internal(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn map_hash_error(error: CredentialHashError) -> Error {
    Error::internal(error.to_string())
}

/// Outcome of [`IdentityService::bootstrap_admin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminBootstrap {
    /// The admin account was created.
    Created,
    /// A user with the admin username already existed; nothing changed.
    AlreadyPresent,
}

/// Identity service implementing the authentication and user driving ports.
#[derive(Clone)]
pub struct IdentityService<R, H> {
    users: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> IdentityService<R, H> {
    /// Create a service over the identity store and credential hasher.
    pub fn new(users: Arc<R>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

impl<R, H> IdentityService<R, H>
where
    R: UserRepository,
    H: CredentialHasher,
{
    /// Create the admin account unless a user with that name already exists.
    ///
    /// Running this on every start is safe; the second run is a no-op.
    pub async fn bootstrap_admin(
        &self,
        username: &Username,
        password: &str,
    ) -> Result<AdminBootstrap, Error> {
        if self
            .users
            .find_by_username(username)
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            info!(username = %username, "admin account already present");
            return Ok(AdminBootstrap::AlreadyPresent);
        }

        let password_hash = self.hasher.hash(password).map_err(map_hash_error)?;
        let created = self
            .users
            .create(&NewUser {
                username: username.clone(),
                password_hash,
                is_admin: true,
            })
            .await;
        match created {
            Ok(user) => {
                info!(user_id = %user.id(), username = %username, "default admin user created");
                Ok(AdminBootstrap::Created)
            }
            // Another instance won the race to seed the account.
            Err(UserPersistenceError::DuplicateUsername { .. }) => Ok(AdminBootstrap::AlreadyPresent),
            Err(err) => Err(map_user_error(err)),
        }
    }
}

#[async_trait]
impl<R, H> LoginService for IdentityService<R, H>
where
    R: UserRepository,
    H: CredentialHasher,
{
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<SessionPrincipal, Error> {
        let Ok(username) = Username::new(credentials.username()) else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let Some(stored) = self
            .users
            .find_by_username(&username)
            .await
            .map_err(map_user_error)?
        else {
            warn!("login rejected for unknown username");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let verified = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .map_err(map_hash_error)?;
        if !verified {
            warn!(user_id = %stored.user.id(), "login rejected for wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        Ok(SessionPrincipal::from(&stored.user))
    }
}

#[async_trait]
impl<R, H> RegistrationService for IdentityService<R, H>
where
    R: UserRepository,
    H: CredentialHasher,
{
    async fn register(&self, registration: &Registration) -> Result<User, Error> {
        if self
            .users
            .find_by_username(registration.username())
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            return Err(Error::conflict(USER_EXISTS));
        }

        let password_hash = self
            .hasher
            .hash(registration.password())
            .map_err(map_hash_error)?;
        let user = self
            .users
            .create(&NewUser {
                username: registration.username().clone(),
                password_hash,
                is_admin: false,
            })
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }
}

#[async_trait]
impl<R, H> UsersQuery for IdentityService<R, H>
where
    R: UserRepository,
    H: CredentialHasher,
{
    async fn list_non_admin_users(&self) -> Result<Vec<User>, Error> {
        self.users.list_non_admin().await.map_err(map_user_error)
    }
}

#[cfg(test)]
#[path = "identity_service_tests.rs"]
mod tests;
