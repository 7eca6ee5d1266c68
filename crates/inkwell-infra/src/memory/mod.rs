//! In-memory repositories.
//!
//! Used when no database is configured and as the store behind service
//! tests. Data is lost on process restart.

mod categories;
mod posts;
mod users;

pub use categories::InMemoryCategoryRepository;
pub use posts::InMemoryPostRepository;
pub use users::InMemoryUserRepository;
