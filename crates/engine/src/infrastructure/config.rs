//! Engine configuration read from the environment.

use std::time::Duration;

pub const DEFAULT_DB_PATH: &str = "docstore.db";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_connections: u32,
    /// How long a writer waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub database: DatabaseConfig,
    pub server_host: String,
    pub server_port: u16,
    /// Comma separated, or `*`. CORS is off when unset.
    pub cors_allowed_origins: Option<String>,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unparsable numbers fall back
    /// to their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database = DatabaseConfig {
            path: lookup("DOCSTORE_DB").unwrap_or_else(|| DEFAULT_DB_PATH.into()),
            max_connections: parse_or(
                "DOCSTORE_MAX_CONNECTIONS",
                lookup("DOCSTORE_MAX_CONNECTIONS"),
                DEFAULT_MAX_CONNECTIONS,
            ),
            busy_timeout: Duration::from_millis(parse_or(
                "DOCSTORE_BUSY_TIMEOUT_MS",
                lookup("DOCSTORE_BUSY_TIMEOUT_MS"),
                DEFAULT_BUSY_TIMEOUT_MS,
            )),
        };

        let port = lookup("SERVER_PORT").or_else(|| lookup("PORT"));

        Self {
            database,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
            server_port: parse_or("SERVER_PORT", port, DEFAULT_PORT),
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, default = %default, "Invalid number, using default");
            default
        }),
    }
}
