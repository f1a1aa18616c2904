//! In-memory post storage - process local, lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::sync::RwLock;

use microblog_core::domain::{Post, PostPage};
use microblog_core::error::ManagerError;
use microblog_core::ports::Manager;

const ID_SUFFIX_RANGE: u32 = 1_000_000;

#[derive(Default)]
struct Posts {
    /// Author id -> that author's post ids in insertion order.
    by_author: HashMap<String, Vec<String>>,
    by_id: HashMap<String, Post>,
}

/// In-memory [`Manager`] with both indexes behind one async `RwLock`.
///
/// Page tokens are offsets into the author's recency-sorted posts, so a post
/// added between two page requests shifts the following pages by one.
pub struct InMemoryManager {
    posts: RwLock<Posts>,
}

impl InMemoryManager {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Posts::default()),
        }
    }
}

impl Default for InMemoryManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Coarse creation second plus a random suffix. Two posts created in the same
/// second can draw the same suffix; callers check for collisions.
fn generate_post_id(created_at: DateTime<Utc>) -> String {
    let suffix = rand::thread_rng().gen_range(0..ID_SUFFIX_RANGE);
    URL_SAFE_NO_PAD.encode(format!("{}:{}", created_at.timestamp(), suffix))
}

fn encode_offset(offset: usize) -> String {
    STANDARD.encode(offset.to_string())
}

fn decode_offset(token: &str) -> Result<usize, ManagerError> {
    let raw = STANDARD
        .decode(token)
        .map_err(|e| ManagerError::InvalidCursor(e.to_string()))?;
    let digits = String::from_utf8(raw).map_err(|e| ManagerError::InvalidCursor(e.to_string()))?;
    digits
        .parse()
        .map_err(|_| ManagerError::InvalidCursor(format!("not an offset: {digits}")))
}

#[async_trait]
impl Manager for InMemoryManager {
    async fn add_post(&self, author_id: &str, text: &str) -> Result<Post, ManagerError> {
        let mut posts = self.posts.write().await;

        let created_at = Utc::now();
        let mut id = generate_post_id(created_at);
        while posts.by_id.contains_key(&id) {
            id = generate_post_id(created_at);
        }

        let post = Post {
            id: id.clone(),
            text: text.to_string(),
            author_id: author_id.to_string(),
            created_at,
            last_modified_at: None,
        };

        posts
            .by_author
            .entry(author_id.to_string())
            .or_default()
            .push(id.clone());
        posts.by_id.insert(id, post.clone());

        tracing::debug!(post_id = %post.id, author_id = %author_id, "Stored post in memory");
        Ok(post)
    }

    async fn get_post(&self, post_id: &str) -> Result<Post, ManagerError> {
        let posts = self.posts.read().await;
        posts
            .by_id
            .get(post_id)
            .cloned()
            .ok_or_else(|| ManagerError::post_not_found(post_id))
    }

    async fn get_posts_in_page(
        &self,
        author_id: &str,
        token: Option<&str>,
        page_size: u8,
    ) -> Result<PostPage, ManagerError> {
        if page_size == 0 {
            return Err(ManagerError::InvalidPageSize(page_size));
        }
        let start = token.map(decode_offset).transpose()?.unwrap_or(0);

        let posts = self.posts.read().await;
        let ids = posts
            .by_author
            .get(author_id)
            .filter(|ids| !ids.is_empty())
            .ok_or_else(|| ManagerError::author_not_found(author_id))?;

        if start > ids.len() {
            return Err(ManagerError::InvalidCursor(format!(
                "offset {start} is past the last of {} posts",
                ids.len()
            )));
        }

        // Newest insertion first, then a stable sort keeps that order for
        // posts sharing a creation timestamp.
        let mut ordered: Vec<&Post> = ids
            .iter()
            .rev()
            .filter_map(|id| posts.by_id.get(id))
            .collect();
        ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let end = (start + usize::from(page_size)).min(ordered.len());
        let page = ordered[start..end].iter().map(|p| (*p).clone()).collect();
        let next_token = (end < ordered.len()).then(|| encode_offset(end));

        Ok(PostPage::new(page, next_token))
    }

    async fn modify_post(&self, post_id: &str, text: &str) -> Result<Post, ManagerError> {
        let mut posts = self.posts.write().await;
        let post = posts
            .by_id
            .get_mut(post_id)
            .ok_or_else(|| ManagerError::post_not_found(post_id))?;

        post.text = text.to_string();
        post.last_modified_at = Some(Utc::now());

        Ok(post.clone())
    }

    async fn is_ready(&self) -> bool {
        true
    }
}
