use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, PageRequest, Post, PostFilter, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Fetch every user whose id is in `ids`. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    /// Exact slug lookup.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    /// Case-insensitive name lookup.
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Category>, RepoError>;

    /// Active categories ordered by name.
    async fn list_active(&self) -> Result<Vec<Category>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// One page of posts matching `filter`, newest first.
    async fn find_page(&self, filter: &PostFilter, page: PageRequest)
    -> Result<Vec<Post>, RepoError>;

    /// Number of posts matching `filter`.
    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError>;

    /// Atomically add one to the view counter, returning the new value.
    /// Returns `None` if the post does not exist.
    async fn increment_view_count(&self, id: Uuid) -> Result<Option<u64>, RepoError>;

    /// Number of posts referencing a category.
    async fn count_by_category(&self, category_id: Uuid) -> Result<u64, RepoError>;
}
