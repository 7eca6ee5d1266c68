//! Read projections. References are resolved to the fields clients may
//! see; emails and password hashes never appear here.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Comment, Post, User};

/// Author or commenter reduced to a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRef {
    pub id: Uuid,
    pub name: String,
}

impl From<&User> for AuthorRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl From<&Category> for CategoryRef {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            slug: category.slug.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub id: Uuid,
    /// `None` when the commenter no longer exists.
    pub user: Option<AuthorRef>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl CommentView {
    pub fn new(comment: Comment, user: Option<AuthorRef>) -> Self {
        Self {
            id: comment.id,
            user,
            content: comment.content,
            created_at: comment.created_at,
        }
    }
}

/// A post with its references populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostView {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    /// `None` for a dangling category reference.
    pub category: Option<CategoryRef>,
    pub author: Option<AuthorRef>,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub view_count: u64,
    /// Only populated on single-post reads and writes; listings leave it out.
    pub comments: Option<Vec<CommentView>>,
    pub comment_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
