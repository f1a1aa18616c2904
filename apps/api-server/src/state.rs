//! Application state - shared across all handlers.

use std::sync::Arc;

#[cfg(feature = "postgres")]
use anyhow::Context;
use microblog_core::Manager;
use microblog_infra::InMemoryManager;

#[cfg(feature = "postgres")]
use microblog_core::ports::Cache;
#[cfg(feature = "postgres")]
use microblog_infra::{CachedManager, InMemoryCache, PersistentManager};

use crate::config::{AppConfig, StorageMode};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<dyn Manager>,
}

impl AppState {
    pub fn new(manager: Arc<dyn Manager>) -> Self {
        Self { manager }
    }

    /// Build the post store selected by [`AppConfig::storage_mode`].
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let manager: Arc<dyn Manager> = match config.storage_mode {
            StorageMode::InMemory => {
                tracing::warn!("Using in-memory post storage; posts are lost on restart");
                Arc::new(InMemoryManager::new())
            }
            #[cfg(feature = "postgres")]
            StorageMode::Persistent => Arc::new(persistent_store(config).await?),
            #[cfg(feature = "postgres")]
            StorageMode::Cached => {
                let store = persistent_store(config).await?;
                let cache = post_cache(config).await?;
                Arc::new(CachedManager::new(store, cache).with_cache_timeout(config.cache_timeout))
            }
            #[cfg(not(feature = "postgres"))]
            mode => anyhow::bail!("storage mode '{mode}' requires the `postgres` feature"),
        };

        tracing::info!(mode = %config.storage_mode, "Application state initialized");

        Ok(Self::new(manager))
    }
}

#[cfg(feature = "postgres")]
async fn persistent_store(config: &AppConfig) -> anyhow::Result<PersistentManager> {
    let db = config
        .database
        .as_ref()
        .context("DATABASE_URL is required for database-backed storage")?;

    PersistentManager::init(db)
        .await
        .context("failed to initialize the posts database")
}

#[cfg(feature = "postgres")]
async fn post_cache(config: &AppConfig) -> anyhow::Result<Arc<dyn Cache>> {
    #[cfg(feature = "redis")]
    {
        match microblog_infra::RedisCache::new(&config.redis).await {
            Ok(cache) => return Ok(Arc::new(cache)),
            Err(e) if config.redis.fallback_to_memory => {
                tracing::error!(
                    "Failed to connect to Redis: {}. Using in-memory post cache.",
                    e
                );
            }
            Err(e) => return Err(e).context("failed to connect to the post cache"),
        }
    }

    #[cfg(not(feature = "redis"))]
    {
        let _ = config;
        tracing::info!("Running without redis feature - using in-memory post cache");
    }

    Ok(Arc::new(InMemoryCache::new()))
}
