//! Listing filters and pagination.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Post;

/// Predicate over posts used by listing queries.
///
/// All set criteria must hold. `search` matches case-insensitively as a
/// literal substring of the title, content or excerpt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub published_only: bool,
    pub category_id: Option<Uuid>,
    pub search: Option<String>,
}

impl PostFilter {
    /// Filter matching every published post.
    pub fn published() -> Self {
        Self {
            published_only: true,
            ..Self::default()
        }
    }

    pub fn in_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Blank search terms are ignored.
    pub fn with_search(mut self, term: impl AsRef<str>) -> Self {
        let term = term.as_ref().trim();
        self.search = (!term.is_empty()).then(|| term.to_string());
        self
    }

    /// Evaluate the filter against a post held in memory.
    pub fn matches(&self, post: &Post) -> bool {
        if self.published_only && !post.is_published {
            return false;
        }
        if self.category_id.is_some_and(|id| id != post.category_id) {
            return false;
        }
        match &self.search {
            Some(term) => {
                let needle = term.to_lowercase();
                let hit = |field: &str| field.to_lowercase().contains(&needle);
                hit(&post.title) || hit(&post.content) || post.excerpt.as_deref().is_some_and(hit)
            }
            None => true,
        }
    }
}

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: u64 = 10;
    pub const MAX_LIMIT: u64 = 100;

    /// Returns `None` when `page` or `limit` is zero. `limit` is capped at
    /// [`PageRequest::MAX_LIMIT`].
    pub fn new(page: u64, limit: u64) -> Option<Self> {
        if page == 0 || limit == 0 {
            return None;
        }
        Some(Self {
            page,
            limit: limit.min(Self::MAX_LIMIT),
        })
    }

    /// Number of records to skip.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    pub fn new(request: PageRequest, total: u64) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total,
            pages: total.div_ceil(request.limit),
        }
    }
}
