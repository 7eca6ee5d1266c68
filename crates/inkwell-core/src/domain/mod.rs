//! Domain entities - the core business objects.

mod category;
mod post;
mod query;
mod user;

pub use category::{Category, slugify};
pub use post::{Comment, Post};
pub use query::{PageRequest, Pagination, PostFilter};
pub use user::{User, UserRole};
