//! Database-backed post storage.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use microblog_core::domain::{Post, PostPage};
use microblog_core::error::ManagerError;
use microblog_core::ports::Manager;

use super::connections::{DEFAULT_OPERATION_TIMEOUT, DatabaseConfig};
use super::entity::post::{self, Entity as PostEntity};

/// [`Manager`] over the `posts` table.
///
/// Page tokens are the id of the last post served, so pages already handed
/// out are unaffected by posts added afterwards.
pub struct PersistentManager {
    db: DbConn,
    operation_timeout: Duration,
}

impl PersistentManager {
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    #[cfg(test)]
    pub(crate) fn into_db(self) -> DbConn {
        self.db
    }

    /// Connect, then make sure the table and author index exist.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let db = super::connect(config).await?;
        super::schema::ensure_schema(&db).await?;
        Ok(Self::new(db).with_operation_timeout(config.operation_timeout))
    }

    /// Run one database round-trip under the operation deadline.
    async fn bounded<T>(&self, query: impl Future<Output = Result<T, DbErr>>) -> Result<T, DbErr> {
        tokio::time::timeout(self.operation_timeout, query)
            .await
            .map_err(|_| {
                DbErr::Custom(format!(
                    "deadline of {:?} exceeded",
                    self.operation_timeout
                ))
            })?
    }
}

fn storage_error(err: DbErr) -> ManagerError {
    tracing::error!(error = %err, "Post storage query failed");
    ManagerError::Storage(err.to_string())
}

#[async_trait]
impl Manager for PersistentManager {
    async fn add_post(&self, author_id: &str, text: &str) -> Result<Post, ManagerError> {
        let row = post::ActiveModel {
            id: NotSet,
            author_id: Set(author_id.to_string()),
            text: Set(text.to_string()),
            created_at: Set(Utc::now().into()),
            last_modified_at: Set(None),
        };

        // INSERT ... RETURNING hands back the row with its assigned id.
        let stored = self
            .bounded(row.insert(&self.db))
            .await
            .map_err(storage_error)?;

        tracing::debug!(post_id = stored.id, author_id = %author_id, "Inserted post");
        Ok(stored.into())
    }

    async fn get_post(&self, post_id: &str) -> Result<Post, ManagerError> {
        // Ids are issued by the sequence; anything else cannot exist.
        let Ok(id) = post_id.parse::<i64>() else {
            return Err(ManagerError::post_not_found(post_id));
        };

        self.bounded(PostEntity::find_by_id(id).one(&self.db))
            .await
            .map_err(storage_error)?
            .map(Into::into)
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
        let anchor = token
            .map(|t| {
                t.parse::<i64>()
                    .map_err(|_| ManagerError::InvalidCursor(format!("not a post id: {t}")))
            })
            .transpose()?;

        let mut query = PostEntity::find().filter(post::Column::AuthorId.eq(author_id));
        if let Some(anchor) = anchor {
            query = query.filter(post::Column::Id.lt(anchor));
        }

        let limit = usize::from(page_size);
        let rows = self
            .bounded(
                query
                    .order_by_desc(post::Column::Id)
                    .limit(u64::from(page_size))
                    .all(&self.db),
            )
            .await
            .map_err(storage_error)?;

        if rows.is_empty() {
            // An anchor on the oldest post lands exactly on the end.
            return match anchor {
                None => Err(ManagerError::author_not_found(author_id)),
                Some(_) => Ok(PostPage::new(Vec::new(), None)),
            };
        }

        // A full page may be followed by more; a short one is the last.
        let has_more = rows.len() == limit;
        let next_token = has_more
            .then(|| rows.last().map(|row| row.id.to_string()))
            .flatten();

        tracing::debug!(
            author_id = %author_id,
            returned = rows.len(),
            has_more,
            "Listed posts"
        );
        Ok(PostPage::new(
            rows.into_iter().map(Into::into).collect(),
            next_token,
        ))
    }

    async fn modify_post(&self, post_id: &str, text: &str) -> Result<Post, ManagerError> {
        let Ok(id) = post_id.parse::<i64>() else {
            return Err(ManagerError::post_not_found(post_id));
        };

        // Single UPDATE ... RETURNING: the edit and the read-back are atomic.
        let edit = post::ActiveModel {
            id: Unchanged(id),
            author_id: NotSet,
            text: Set(text.to_string()),
            created_at: NotSet,
            last_modified_at: Set(Some(Utc::now().into())),
        };

        match self.bounded(edit.update(&self.db)).await {
            Ok(updated) => Ok(updated.into()),
            Err(DbErr::RecordNotUpdated) => Err(ManagerError::post_not_found(post_id)),
            Err(e) => Err(storage_error(e)),
        }
    }

    async fn is_ready(&self) -> bool {
        match self.bounded(self.db.ping()).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Database ping failed");
                false
            }
        }
    }
}
