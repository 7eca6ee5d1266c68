//! Application services orchestrating the repository ports.

mod categories;
mod posts;
mod views;

pub use categories::{CategoryInput, CategoryService};
pub use posts::{PostInput, PostListQuery, PostPage, PostService};
pub use views::{AuthorRef, CategoryRef, CommentView, PostView};

use uuid::Uuid;

/// The authenticated user performing a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub is_admin: bool,
}

impl Actor {
    pub fn new(user_id: Uuid, is_admin: bool) -> Self {
        Self { user_id, is_admin }
    }
}
