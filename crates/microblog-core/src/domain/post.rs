use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post entity - a short text authored by a single user.
///
/// The `id` is always assigned by the storage backend that owns the post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub text: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_at: Option<DateTime<Utc>>,
}

/// One page of an author's posts, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPage {
    pub posts: Vec<Post>,
    /// Opaque continuation token. `None` once the last page has been served.
    pub next_token: Option<String>,
}

impl PostPage {
    pub fn new(posts: Vec<Post>, next_token: Option<String>) -> Self {
        Self { posts, next_token }
    }

    pub fn is_last(&self) -> bool {
        self.next_token.is_none()
    }
}
