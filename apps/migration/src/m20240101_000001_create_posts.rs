use sea_orm_migration::prelude::*;

use microblog_infra::database::entity::post;
use microblog_infra::database::schema::{author_recency_index, posts_table};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(posts_table(manager.get_database_backend()))
            .await?;
        manager.create_index(author_recency_index()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(post::Entity).if_exists().to_owned())
            .await
    }
}
