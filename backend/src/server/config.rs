//! HTTP server configuration: OrthoConfig settings and the assembled server
//! configuration object.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use chrono::Duration;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use taskdeck::outbound::persistence::{DbPool, PoolConfig};
use taskdeck::outbound::security::{DEFAULT_TOKEN_TTL_HOURS, TokenSecret};

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TOKEN_SECRET_FILE: &str = "/var/run/secrets/token_secret";
const DEFAULT_DB_POOL_SIZE: u32 = 10;

/// Settings read from `TASKDECK_*` environment variables, configuration
/// files and command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TASKDECK")]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: Option<IpAddr>,
    /// TCP port to bind.
    pub port: Option<u16>,
    /// PostgreSQL URL. Without it the in-memory stores are used.
    pub database_url: Option<String>,
    /// Maximum PostgreSQL connections.
    pub db_pool_size: Option<u32>,
    /// File holding the access-token signing secret.
    pub token_secret_file: Option<PathBuf>,
    /// Access-token lifetime in hours.
    pub token_ttl_hours: Option<i64>,
    /// Fall back to a random secret in release builds when the file is
    /// missing.
    #[ortho_config(default = false)]
    pub allow_ephemeral_secret: bool,
}

impl ServerSettings {
    /// Socket address to bind, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Path of the token signing secret.
    pub fn token_secret_file(&self) -> &Path {
        self.token_secret_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_TOKEN_SECRET_FILE))
    }

    /// Token lifetime; non-positive overrides fall back to the default.
    pub fn token_ttl(&self) -> Duration {
        let hours = self
            .token_ttl_hours
            .filter(|hours| *hours > 0)
            .unwrap_or(DEFAULT_TOKEN_TTL_HOURS);
        Duration::hours(hours)
    }

    /// Pool configuration when a database URL is set.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url.as_ref().map(|url| {
            PoolConfig::new(url.clone())
                .with_max_size(self.db_pool_size.unwrap_or(DEFAULT_DB_POOL_SIZE))
        })
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) token_secret: TokenSecret,
    pub(crate) token_ttl: Duration,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration with in-memory storage.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, token_secret: TokenSecret, token_ttl: Duration) -> Self {
        Self {
            bind_addr,
            token_secret,
            token_ttl,
            db_pool: None,
        }
    }

    /// Attach a database connection pool; repositories switch to Diesel.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "TASKDECK_HOST",
        "TASKDECK_PORT",
        "TASKDECK_DATABASE_URL",
        "TASKDECK_DB_POOL_SIZE",
        "TASKDECK_TOKEN_SECRET_FILE",
        "TASKDECK_TOKEN_TTL_HOURS",
        "TASKDECK_ALLOW_EPHEMERAL_SECRET",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("taskdeck")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "0.0.0.0:8080".parse().expect("addr"));
        assert_eq!(
            settings.token_secret_file(),
            Path::new(DEFAULT_TOKEN_SECRET_FILE)
        );
        assert_eq!(settings.token_ttl(), Duration::hours(24));
        assert!(!settings.allow_ephemeral_secret);
        assert!(settings.pool_config().is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("TASKDECK_HOST", Some("127.0.0.1".to_owned())),
            ("TASKDECK_PORT", Some("9090".to_owned())),
            (
                "TASKDECK_DATABASE_URL",
                Some("postgres://taskdeck@localhost/taskdeck".to_owned()),
            ),
            ("TASKDECK_DB_POOL_SIZE", Some("3".to_owned())),
            (
                "TASKDECK_TOKEN_SECRET_FILE",
                Some("/tmp/taskdeck_secret".to_owned()),
            ),
            ("TASKDECK_TOKEN_TTL_HOURS", Some("2".to_owned())),
            ("TASKDECK_ALLOW_EPHEMERAL_SECRET", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "127.0.0.1:9090".parse().expect("addr"));
        assert_eq!(
            settings.token_secret_file(),
            Path::new("/tmp/taskdeck_secret")
        );
        assert_eq!(settings.token_ttl(), Duration::hours(2));
        assert!(settings.allow_ephemeral_secret);
        let pool = settings.pool_config().expect("pool config");
        assert_eq!(pool.database_url(), "postgres://taskdeck@localhost/taskdeck");
        assert_eq!(pool.max_size(), 3);
    }

    #[rstest]
    #[case(Some(0))]
    #[case(Some(-5))]
    #[case(None)]
    fn unusable_ttls_fall_back_to_the_default(#[case] hours: Option<i64>) {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));
        let mut settings = load_from_empty_args();
        settings.token_ttl_hours = hours;
        assert_eq!(settings.token_ttl(), Duration::hours(DEFAULT_TOKEN_TTL_HOURS));
    }
}
