use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment embedded in a post. It has no identity outside its post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(user_id: Uuid, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            content,
            created_at: Utc::now(),
        }
    }
}

/// Post entity - a blog post with its embedded comments.
///
/// `comments` is kept newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub category_id: Uuid,
    pub author_id: Uuid,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub view_count: u64,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new unpublished post with no tags or comments.
    pub fn new(author_id: Uuid, category_id: Uuid, title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            excerpt: None,
            featured_image: None,
            category_id,
            author_id,
            tags: Vec::new(),
            is_published: false,
            view_count: 0,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Prepend a comment and bump `updated_at`.
    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.insert(0, comment);
        self.updated_at = Utc::now();
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}
