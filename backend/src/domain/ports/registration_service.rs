//! Driving port for self-service account registration.

use async_trait::async_trait;

use crate::domain::{Error, Registration, User};

/// Domain use-case port for creating non-admin accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Create a non-admin user. Fails with a conflict when the username is
    /// already taken.
    async fn register(&self, registration: &Registration) -> Result<User, Error>;
}
