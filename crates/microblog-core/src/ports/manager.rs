use async_trait::async_trait;

use crate::domain::{Post, PostPage};
use crate::error::ManagerError;

/// Post storage contract implemented by every backend.
///
/// Cancelling an operation means dropping its future; network-backed
/// implementations bound each round-trip with their own deadline and report
/// an elapsed deadline as [`ManagerError::Storage`].
#[async_trait]
pub trait Manager: Send + Sync {
    /// Create and persist a new post, returning it with its assigned id.
    async fn add_post(&self, author_id: &str, text: &str) -> Result<Post, ManagerError>;

    /// Fetch a single post by id.
    async fn get_post(&self, post_id: &str) -> Result<Post, ManagerError>;

    /// List up to `page_size` posts of an author, most recent first.
    ///
    /// `token` is the `next_token` of the previous page, or `None` for the
    /// first page. Token formats are backend specific and must not be mixed.
    async fn get_posts_in_page(
        &self,
        author_id: &str,
        token: Option<&str>,
        page_size: u8,
    ) -> Result<PostPage, ManagerError>;

    /// Replace the text of a post and stamp its modification time.
    async fn modify_post(&self, post_id: &str, text: &str) -> Result<Post, ManagerError>;

    /// Whether the backend can currently serve requests.
    async fn is_ready(&self) -> bool;
}
