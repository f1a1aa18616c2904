//! Application configuration loaded from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use microblog_infra::database::DatabaseConfig;
#[cfg(feature = "redis")]
use microblog_infra::cache::RedisConfig;

/// Which post store the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    /// Process-local store, lost on restart.
    #[default]
    InMemory,
    /// Database-backed store.
    Persistent,
    /// Database-backed store behind the post cache.
    Cached,
}

impl StorageMode {
    pub fn needs_database(self) -> bool {
        matches!(self, Self::Persistent | Self::Cached)
    }
}

impl FromStr for StorageMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inmemory" | "memory" => Ok(Self::InMemory),
            "persistent" | "postgres" => Ok(Self::Persistent),
            "cached" => Ok(Self::Cached),
            other => Err(ConfigError::UnknownStorageMode(other.to_string())),
        }
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InMemory => "inmemory",
            Self::Persistent => "persistent",
            Self::Cached => "cached",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown STORAGE_MODE '{0}' (expected inmemory, persistent or cached)")]
    UnknownStorageMode(String),

    #[error("DATABASE_URL must be set for storage mode '{0}'")]
    MissingDatabaseUrl(StorageMode),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage_mode: StorageMode,
    pub database: Option<DatabaseConfig>,
    #[cfg(feature = "redis")]
    pub redis: RedisConfig,
    /// Upper bound for a single post cache round-trip.
    pub cache_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let storage_mode = storage_mode_from(env::var("STORAGE_MODE").ok())?;

        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            max_connections: parse_env("DB_MAX_CONNECTIONS").unwrap_or(100),
            min_connections: parse_env("DB_MIN_CONNECTIONS").unwrap_or(10),
            operation_timeout: parse_env("DB_OPERATION_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(microblog_infra::database::DEFAULT_OPERATION_TIMEOUT),
            ..DatabaseConfig::new(url)
        });

        if storage_mode.needs_database() && database.is_none() {
            return Err(ConfigError::MissingDatabaseUrl(storage_mode));
        }

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env("PORT").unwrap_or(8080),
            storage_mode,
            database,
            #[cfg(feature = "redis")]
            redis: RedisConfig::from_env(),
            cache_timeout: Duration::from_millis(
                parse_env("CACHE_OPERATION_TIMEOUT_MS").unwrap_or(250),
            ),
        })
    }
}

/// An unset or blank selector means the default store.
fn storage_mode_from(raw: Option<String>) -> Result<StorageMode, ConfigError> {
    let mode: Option<StorageMode> = raw
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.parse())
        .transpose()?;
    Ok(mode.unwrap_or_default())
}

fn parse_env<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
