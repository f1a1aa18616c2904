//! Storage-level error types.

use thiserror::Error;

/// Errors returned by every [`Manager`](crate::ports::Manager) backend.
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid page token: {0}")]
    InvalidCursor(String),

    #[error("Invalid page size: {0}")]
    InvalidPageSize(u8),

    #[error("Storage failure: {0}")]
    Storage(String),
}

impl ManagerError {
    pub fn post_not_found(post_id: &str) -> Self {
        Self::NotFound(format!("post {post_id} not found"))
    }

    pub fn author_not_found(author_id: &str) -> Self {
        Self::NotFound(format!("no posts for author {author_id}"))
    }

}
