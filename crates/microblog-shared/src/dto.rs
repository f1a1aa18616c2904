//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Body of a create or edit request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostTextRequest {
    pub text: String,
}

/// A post as rendered on the wire. Timestamps are RFC 3339.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub text: String,
    pub author_id: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_at: Option<String>,
}

/// One page of an author's posts. `next_page` is empty on the last page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsPageResponse {
    pub posts: Vec<PostResponse>,
    pub next_page: String,
}
