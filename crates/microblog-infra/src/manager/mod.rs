//! Post storage backends implementing the `Manager` port.
//!
//! The database-backed implementation lives in [`crate::database`].

mod cached;
mod memory;

pub use cached::{CachedManager, POST_CACHE_TTL};
pub use memory::InMemoryManager;
