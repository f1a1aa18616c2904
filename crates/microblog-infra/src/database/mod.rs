//! Database connection management and the persistent post store.

mod connections;

#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
mod persistent;
#[cfg(feature = "postgres")]
pub mod schema;

pub use connections::{DEFAULT_OPERATION_TIMEOUT, DatabaseConfig};

#[cfg(feature = "postgres")]
pub use connections::connect;
#[cfg(feature = "postgres")]
pub use persistent::PersistentManager;

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
