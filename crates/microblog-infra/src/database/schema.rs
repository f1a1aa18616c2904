//! Posts table and index definitions, shared by startup and the migration tool.

use sea_orm::sea_query::{Index, IndexCreateStatement, IndexOrder, TableCreateStatement};
use sea_orm::{ConnectionTrait, DbBackend, DbErr, Schema};

use super::entity::post;

pub const AUTHOR_RECENCY_INDEX: &str = "idx_posts_author_id_id_desc";

/// `posts` table derived from the entity.
pub fn posts_table(backend: DbBackend) -> TableCreateStatement {
    Schema::new(backend)
        .create_table_from_entity(post::Entity)
        .if_not_exists()
        .to_owned()
}

/// `(author_id, id DESC)`: serves author-scoped listings newest first.
pub fn author_recency_index() -> IndexCreateStatement {
    Index::create()
        .if_not_exists()
        .name(AUTHOR_RECENCY_INDEX)
        .table(post::Entity)
        .col(post::Column::AuthorId)
        .col((post::Column::Id, IndexOrder::Desc))
        .to_owned()
}

/// Idempotently create the table and its index.
pub async fn ensure_schema<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    db.execute(backend.build(&posts_table(backend))).await?;
    db.execute(backend.build(&author_recency_index())).await?;
    tracing::info!(index = AUTHOR_RECENCY_INDEX, "Posts schema ensured");
    Ok(())
}
