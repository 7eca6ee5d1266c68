use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category entity - a named tag grouping posts, addressable by slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create an active category; the slug is derived from the name.
    pub fn new(name: String, description: Option<String>, color: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            slug: slugify(&name),
            name,
            description,
            color,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rename the category, recomputing its slug.
    pub fn rename(&mut self, name: String) {
        self.slug = slugify(&name);
        self.name = name;
    }
}

/// Lowercase, ASCII-transliterated, dash-separated form of `name`.
pub fn slugify(name: &str) -> String {
    slug::slugify(name)
}
