//! Post entity for SeaORM.
//!
//! Tags and comments live in JSONB columns so a post is read and written
//! as one document.

use sea_orm::entity::prelude::*;
use sea_orm::{FromJsonQueryResult, NotSet, Set};
use serde::{Deserialize, Serialize};

use inkwell_core::domain::Comment;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct TagList(pub Vec<String>);

/// Embedded comments, newest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct CommentList(pub Vec<Comment>);

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub category_id: Uuid,
    pub author_id: Uuid,
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: TagList,
    pub is_published: bool,
    pub view_count: i64,
    #[sea_orm(column_type = "JsonBinary")]
    pub comments: CommentList,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

/// Relations are declared for joins only; the schema has no foreign keys.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for inkwell_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            excerpt: model.excerpt,
            featured_image: model.featured_image,
            category_id: model.category_id,
            author_id: model.author_id,
            tags: model.tags.0,
            is_published: model.is_published,
            view_count: u64::try_from(model.view_count).unwrap_or_default(),
            comments: model.comments.0,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

// `view_count` is only ever written by the atomic increment; a whole-document
// save leaves the column alone so concurrent views are not lost.
impl From<inkwell_core::domain::Post> for ActiveModel {
    fn from(post: inkwell_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            title: Set(post.title),
            content: Set(post.content),
            excerpt: Set(post.excerpt),
            featured_image: Set(post.featured_image),
            category_id: Set(post.category_id),
            author_id: Set(post.author_id),
            tags: Set(TagList(post.tags)),
            is_published: Set(post.is_published),
            view_count: NotSet,
            comments: Set(CommentList(post.comments)),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
