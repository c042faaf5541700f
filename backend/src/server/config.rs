//! Server settings loaded via OrthoConfig, and the runtime configuration
//! built from them.

use std::net::SocketAddr;

use employees::domain::Error;
use employees::outbound::persistence::{DbPool, PoolConfig};
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Deployment settings, read from CLI flags, `EMPLOYEES_*` environment
/// variables, and config files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EMPLOYEES")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. Without one the service keeps records in
    /// memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Apply pending schema migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

impl ServerSettings {
    /// Parse the configured bind address, falling back to the default.
    ///
    /// # Errors
    ///
    /// `ConfigurationError` when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, Error> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| {
            Error::configuration(format!("invalid bind address {raw:?}: {err}"))
        })
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Database URL with blank values treated as absent.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Pool configuration when a database is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url()
            .map(|url| PoolConfig::new(url).with_max_size(self.pool_max_size()))
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
        }
    }

    /// Attach a database connection pool. Without one the server falls
    /// back to the in-memory employee store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use employees::domain::ErrorCode;
    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "EMPLOYEES_BIND_ADDR",
        "EMPLOYEES_DATABASE_URL",
        "EMPLOYEES_POOL_MAX_SIZE",
        "EMPLOYEES_RUN_MIGRATIONS",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("employees")])
            .expect("config should load")
    }

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|&name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| (*value).to_owned());
                (name, value)
            })
            .collect()
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal address")
        );
        assert!(settings.database_url().is_none());
        assert!(settings.pool_config().is_none());
        assert_eq!(settings.pool_max_size(), 10);
        assert!(settings.run_migrations);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("EMPLOYEES_BIND_ADDR", "127.0.0.1:9090"),
            ("EMPLOYEES_DATABASE_URL", "postgres://localhost/employees"),
            ("EMPLOYEES_POOL_MAX_SIZE", "4"),
            ("EMPLOYEES_RUN_MIGRATIONS", "false"),
        ]));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("configured address").port(),
            9090
        );
        let pool = settings.pool_config().expect("pool config");
        assert_eq!(pool.database_url(), "postgres://localhost/employees");
        assert_eq!(pool.max_size(), 4);
        assert!(!settings.run_migrations);
    }

    #[rstest]
    fn blank_database_url_means_in_memory() {
        let _guard = lock_env(env_with(&[("EMPLOYEES_DATABASE_URL", "   ")]));

        assert!(load_from_empty_args().database_url().is_none());
    }

    #[rstest]
    fn unparsable_bind_address_is_a_configuration_error() {
        let _guard = lock_env(env_with(&[("EMPLOYEES_BIND_ADDR", "not-an-address")]));

        let err = load_from_empty_args()
            .bind_addr()
            .expect_err("invalid address");

        assert_eq!(err.code(), ErrorCode::ConfigurationError);
    }
}
