//! In-memory session registry.
//!
//! Sessions are keyed by a 256-bit random token rendered as hex. Each entry
//! expires a fixed time after it was opened; expired entries are dropped when
//! looked up and swept whenever a new session opens.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::{Clock, DefaultClock};
use tracing::debug;

use crate::domain::ports::{SessionRegistry, SessionRegistryError};
use crate::domain::{SessionPrincipal, SessionToken};

/// Default lifetime of a session.
pub const DEFAULT_SESSION_TTL: TimeDelta = TimeDelta::hours(2);

const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone)]
struct SessionEntry {
    principal: SessionPrincipal,
    expires_at: DateTime<Utc>,
}

/// Process-local [`SessionRegistry`] with a fixed time-to-live.
#[derive(Clone)]
pub struct InMemorySessionRegistry {
    sessions: Arc<Mutex<HashMap<String, SessionEntry>>>,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
}

impl Default for InMemorySessionRegistry {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock), DEFAULT_SESSION_TTL)
    }
}

impl InMemorySessionRegistry {
    /// Create a registry measuring expiry with `clock`.
    pub fn new(clock: Arc<dyn Clock>, ttl: TimeDelta) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            clock,
            ttl,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, SessionEntry>>, SessionRegistryError> {
        self.sessions
            .lock()
            .map_err(|_| SessionRegistryError::store("session registry lock poisoned"))
    }
}

fn generate_token() -> Result<SessionToken, SessionRegistryError> {
    let mut bytes = [0_u8; TOKEN_BYTES];
    getrandom::getrandom(&mut bytes)
        .map_err(|err| SessionRegistryError::token_generation(err.to_string()))?;
    SessionToken::new(hex::encode(bytes))
        .ok_or_else(|| SessionRegistryError::token_generation("empty token"))
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn open(
        &self,
        principal: SessionPrincipal,
    ) -> Result<SessionToken, SessionRegistryError> {
        let token = generate_token()?;
        let now = self.clock.utc();
        let mut sessions = self.lock()?;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.expires_at > now);
        let swept = before - sessions.len();
        if swept > 0 {
            debug!(swept, "expired sessions removed");
        }
        sessions.insert(
            token.as_ref().to_owned(),
            SessionEntry {
                principal,
                expires_at: now + self.ttl,
            },
        );
        Ok(token)
    }

    async fn resolve(
        &self,
        token: &SessionToken,
    ) -> Result<Option<SessionPrincipal>, SessionRegistryError> {
        let now = self.clock.utc();
        let mut sessions = self.lock()?;
        match sessions.get(token.as_ref()) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.principal.clone())),
            Some(_) => {
                sessions.remove(token.as_ref());
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn close(&self, token: &SessionToken) -> Result<bool, SessionRegistryError> {
        let mut sessions = self.lock()?;
        Ok(sessions.remove(token.as_ref()).is_some())
    }
}
