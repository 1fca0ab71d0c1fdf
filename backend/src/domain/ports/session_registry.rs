//! Port for the server-side session store.
//!
//! Sessions are keyed by an opaque token. The token travels to the client in
//! the session cookie; everything else stays on the server so logout revokes
//! the session outright.

use async_trait::async_trait;

use crate::domain::{SessionPrincipal, SessionToken};

use super::define_port_error;

define_port_error! {
    /// Errors raised by session registry adapters.
    pub enum SessionRegistryError {
        /// A fresh token could not be generated.
        TokenGeneration { message: String } => "session token generation failed: {message}",
        /// The backing store rejected the operation.
        Store { message: String } => "session store failed: {message}",
    }
}

/// Port for opening, resolving and closing sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Open a session for a principal and return its token.
    async fn open(&self, principal: SessionPrincipal)
    -> Result<SessionToken, SessionRegistryError>;

    /// Resolve a token to its principal. Expired or unknown tokens yield `None`.
    async fn resolve(
        &self,
        token: &SessionToken,
    ) -> Result<Option<SessionPrincipal>, SessionRegistryError>;

    /// Close a session, returning whether it was open.
    async fn close(&self, token: &SessionToken) -> Result<bool, SessionRegistryError>;
}
