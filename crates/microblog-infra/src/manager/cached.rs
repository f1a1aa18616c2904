//! Cache-aside decorator over any post [`Manager`].
//!
//! Single-post reads go to the cache first and fill it on a miss; creates and
//! edits write the fresh post through to the cache. Listings are never cached.
//! The cache is disposable: every cache failure is logged and swallowed, so an
//! outage only costs latency.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use microblog_core::domain::{Post, PostPage};
use microblog_core::error::ManagerError;
use microblog_core::ports::{Cache, Manager};

/// How long a cached post may be served before it is re-read from storage.
pub const POST_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

const DEFAULT_CACHE_TIMEOUT: Duration = Duration::from_millis(250);

fn cache_key(post_id: &str) -> String {
    format!("post:{post_id}")
}

/// Wraps a storage backend with a post cache.
pub struct CachedManager<M> {
    inner: M,
    cache: Arc<dyn Cache>,
    ttl: Duration,
    cache_timeout: Duration,
}

impl<M: Manager> CachedManager<M> {
    pub fn new(inner: M, cache: Arc<dyn Cache>) -> Self {
        Self {
            inner,
            cache,
            ttl: POST_CACHE_TTL,
            cache_timeout: DEFAULT_CACHE_TIMEOUT,
        }
    }

    /// Upper bound for a single cache round-trip.
    pub fn with_cache_timeout(mut self, timeout: Duration) -> Self {
        self.cache_timeout = timeout;
        self
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> M {
        self.inner
    }

    async fn lookup(&self, post_id: &str) -> Option<Post> {
        let key = cache_key(post_id);
        let raw = match tokio::time::timeout(self.cache_timeout, self.cache.get(&key)).await {
            Ok(raw) => raw?,
            Err(_) => {
                tracing::warn!(key = %key, "Cache read timed out");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(post) => Some(post),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    /// Best-effort cache fill; failures never reach the caller.
    async fn remember(&self, post: &Post) {
        let key = cache_key(&post.id);
        let raw = match serde_json::to_string(post) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to encode post for cache");
                return;
            }
        };

        let write = self.cache.set(&key, &raw, Some(self.ttl));
        match tokio::time::timeout(self.cache_timeout, write).await {
            Ok(Ok(())) => tracing::debug!(key = %key, "Cached post"),
            Ok(Err(e)) => tracing::warn!(key = %key, error = %e, "Cache write failed"),
            Err(_) => tracing::warn!(key = %key, "Cache write timed out"),
        }
    }
}

#[async_trait]
impl<M: Manager> Manager for CachedManager<M> {
    async fn add_post(&self, author_id: &str, text: &str) -> Result<Post, ManagerError> {
        let created = self.inner.add_post(author_id, text).await?;
        self.remember(&created).await;
        Ok(created)
    }

    async fn get_post(&self, post_id: &str) -> Result<Post, ManagerError> {
        if let Some(cached) = self.lookup(post_id).await {
            tracing::debug!(post_id = %post_id, "Post cache hit");
            return Ok(cached);
        }

        let post = self.inner.get_post(post_id).await?;
        self.remember(&post).await;
        Ok(post)
    }

    async fn get_posts_in_page(
        &self,
        author_id: &str,
        token: Option<&str>,
        page_size: u8,
    ) -> Result<PostPage, ManagerError> {
        self.inner
            .get_posts_in_page(author_id, token, page_size)
            .await
    }

    async fn modify_post(&self, post_id: &str, text: &str) -> Result<Post, ManagerError> {
        let updated = self.inner.modify_post(post_id, text).await?;
        self.remember(&updated).await;
        Ok(updated)
    }

    async fn is_ready(&self) -> bool {
        let cache_ready = match tokio::time::timeout(self.cache_timeout, self.cache.ping()).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Cache ping failed");
                false
            }
            Err(_) => {
                tracing::warn!("Cache ping timed out");
                false
            }
        };

        cache_ready && self.inner.is_ready().await
    }
}
