//! Post entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    /// Sequence-assigned, so id order is insertion order.
    #[sea_orm(primary_key)]
    pub id: i64,
    pub author_id: String,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    pub created_at: DateTimeWithTimeZone,
    pub last_modified_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for microblog_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id.to_string(),
            text: model.text,
            author_id: model.author_id,
            created_at: model.created_at.into(),
            last_modified_at: model.last_modified_at.map(Into::into),
        }
    }
}
