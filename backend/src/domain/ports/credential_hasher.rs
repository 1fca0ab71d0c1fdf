//! Port for one-way password credential hashing.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential hasher adapters.
    pub enum CredentialHashError {
        /// Hashing a new credential failed.
        Hash { message: String } => "credential hashing failed: {message}",
        /// A stored credential could not be parsed.
        MalformedHash { message: String } => "stored credential is malformed: {message}",
    }
}

/// Hashes and verifies password credentials.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Produce a salted hash for a plaintext password.
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialHashError>;

    /// Check a plaintext password against a stored hash.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, CredentialHashError>;
}
