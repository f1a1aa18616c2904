//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod cache;
mod manager;

pub use cache::{Cache, CacheError};
pub use manager::Manager;
