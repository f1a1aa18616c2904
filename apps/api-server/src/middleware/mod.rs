//! Middleware modules.

pub mod author;
pub mod error;
