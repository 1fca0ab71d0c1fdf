//! Argon2 credential hasher.
//!
//! Produces PHC-formatted Argon2id hashes with a random 16-byte salt drawn
//! from the operating system. Stored hashes carry their own parameters, so
//! hashes made with different cost settings still verify.

use argon2::password_hash::{
    Error as PasswordHashError, PasswordHash as PhcHash, PasswordHasher, PasswordVerifier,
    SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::domain::PasswordHash;
use crate::domain::ports::{CredentialHashError, CredentialHasher};

const SALT_LEN: usize = 16;

/// Argon2id implementation of the [`CredentialHasher`] port.
#[derive(Clone, Default)]
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
}

impl Argon2CredentialHasher {
    /// Hasher using the crate's recommended default cost parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hasher with custom cost parameters.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialHashError::Hash`] when the parameters are out of
    /// range for Argon2.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, CredentialHashError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|err| CredentialHashError::hash(err.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

fn random_salt() -> Result<SaltString, CredentialHashError> {
    let mut bytes = [0_u8; SALT_LEN];
    getrandom::getrandom(&mut bytes).map_err(|err| CredentialHashError::hash(err.to_string()))?;
    SaltString::encode_b64(&bytes).map_err(|err| CredentialHashError::hash(err.to_string()))
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialHashError> {
        let salt = random_salt()?;
        let phc = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| CredentialHashError::hash(err.to_string()))?;
        Ok(PasswordHash::new(phc.to_string()))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, CredentialHashError> {
        let parsed = PhcHash::new(hash.as_ref())
            .map_err(|err| CredentialHashError::malformed_hash(err.to_string()))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(err) => Err(CredentialHashError::malformed_hash(err.to_string())),
        }
    }
}
