//! Server settings and the assembled server configuration.

use std::fmt;
use std::net::SocketAddr;

use inventory_backend::domain::Username;
use inventory_backend::inbound::http::session_config::SessionSettings;
use inventory_backend::outbound::persistence::{DbPool, PoolConfig};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin_password";

/// Settings read from `INVENTORY_*` environment variables, matching CLI
/// flags or a configuration file.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "INVENTORY")]
pub struct ServerSettings {
    /// PostgreSQL URL; without one the server runs on the in-memory store.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Listen address.
    pub bind_addr: Option<SocketAddr>,
    /// Username of the bootstrap admin.
    pub admin_username: Option<String>,
    /// Password given to the bootstrap admin when it is first created.
    pub admin_password: Option<String>,
}

impl fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerSettings")
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("db_max_connections", &self.db_max_connections)
            .field("bind_addr", &self.bind_addr)
            .field("admin_username", &self.admin_username)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ServerSettings {
    /// Configured listen address or `0.0.0.0:5000`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)))
    }

    /// Non-blank database URL, if configured.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Pool configuration for the configured database, if any.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let config = PoolConfig::new(self.database_url()?);
        Some(match self.db_max_connections {
            Some(max) => config.with_max_size(max),
            None => config,
        })
    }

    /// Bootstrap admin credentials, falling back to the defaults.
    pub fn admin_credentials(&self) -> Result<AdminCredentials, String> {
        let username = Username::new(
            self.admin_username
                .as_deref()
                .unwrap_or(DEFAULT_ADMIN_USERNAME),
        )
        .map_err(|err| format!("invalid admin username: {err}"))?;
        let password = self
            .admin_password
            .clone()
            .filter(|password| !password.is_empty())
            .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_owned());
        Ok(AdminCredentials {
            username,
            password: Zeroizing::new(password),
        })
    }
}

/// Credentials for the admin account seeded at startup.
#[derive(Clone)]
pub struct AdminCredentials {
    pub(crate) username: Username,
    pub(crate) password: Zeroizing<String>,
}

/// Everything needed to build and bind the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) admin: AdminCredentials,
}

impl ServerConfig {
    /// Construct a configuration that uses the in-memory store.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, admin: AdminCredentials) -> Self {
        Self {
            session,
            bind_addr,
            db_pool: None,
            admin,
        }
    }

    /// Use PostgreSQL-backed repositories from `pool`.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings loading.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "INVENTORY_DATABASE_URL",
        "INVENTORY_DB_MAX_CONNECTIONS",
        "INVENTORY_BIND_ADDR",
        "INVENTORY_ADMIN_USERNAME",
        "INVENTORY_ADMIN_PASSWORD",
    ];

    fn load() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("inventory-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load();
        assert_eq!(settings.bind_addr(), "0.0.0.0:5000".parse().expect("addr"));
        assert!(settings.database_url().is_none());
        assert!(settings.pool_config().is_none());
        let admin = settings.admin_credentials().expect("admin");
        assert_eq!(admin.username.as_ref(), "admin");
        assert_eq!(admin.password.as_str(), "admin_password");
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("INVENTORY_DATABASE_URL", Some("postgres://db/inventory".to_owned())),
            ("INVENTORY_DB_MAX_CONNECTIONS", Some("3".to_owned())),
            ("INVENTORY_BIND_ADDR", Some("127.0.0.1:8080".to_owned())),
            ("INVENTORY_ADMIN_USERNAME", Some("root".to_owned())),
            ("INVENTORY_ADMIN_PASSWORD", Some("s3cret".to_owned())),
        ]);

        let settings = load();
        assert_eq!(settings.database_url(), Some("postgres://db/inventory"));
        assert_eq!(settings.pool_config().map(|config| config.max_size()), Some(3));
        assert_eq!(settings.bind_addr(), "127.0.0.1:8080".parse().expect("addr"));
        let admin = settings.admin_credentials().expect("admin");
        assert_eq!(admin.username.as_ref(), "root");
        assert_eq!(admin.password.as_str(), "s3cret");
    }

    #[rstest]
    fn blank_database_url_means_in_memory() {
        let _guard = lock_env([("INVENTORY_DATABASE_URL", Some("  ".to_owned()))]);
        assert!(load().database_url().is_none());
    }

    #[rstest]
    fn debug_output_redacts_secrets() {
        let settings = ServerSettings {
            database_url: Some("postgres://user:pw@db/inventory".to_owned()),
            db_max_connections: None,
            bind_addr: None,
            admin_username: None,
            admin_password: Some("hunter2".to_owned()),
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("user:pw"));
    }
}
