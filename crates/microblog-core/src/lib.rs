//! # Microblog Core
//!
//! The domain layer of the microblog service: the `Post` entity, the storage
//! contract every backend implements, and the errors that cross it.
//! This crate has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use domain::{Post, PostPage};
pub use error::ManagerError;
pub use ports::Manager;
