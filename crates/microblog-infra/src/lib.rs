//! # Microblog Infrastructure
//!
//! Concrete implementations of the ports defined in `microblog-core`: the
//! in-memory, database-backed and cache-aside post stores, and the caches the
//! decorator sits on.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL post store via SeaORM
//! - `redis` - Redis post cache

pub mod cache;
pub mod database;
pub mod manager;

// Re-exports - In-Memory
pub use cache::InMemoryCache;
pub use database::DatabaseConfig;
pub use manager::{CachedManager, InMemoryManager, POST_CACHE_TTL};

#[cfg(feature = "postgres")]
pub use database::PersistentManager;

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use cache::{RedisCache, RedisConfig};
