//! Application state - shared across all handlers.

use std::sync::Arc;

use inkwell_core::ports::{
    CategoryRepository, PasswordService, PostRepository, TokenService, UserRepository,
};
use inkwell_core::services::{CategoryService, PostService};
use inkwell_infra::database::DatabaseConfig;
use inkwell_infra::{
    Argon2PasswordService, InMemoryCategoryRepository, InMemoryPostRepository,
    InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
use inkwell_infra::database::{
    PostgresCategoryRepository, PostgresPostRepository, PostgresUserRepository, connect,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub categories: Arc<CategoryService>,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    /// Storage backend name reported by the health check.
    pub storage: &'static str,
}

/// The three repositories every service is built from.
struct Repositories {
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
    posts: Arc<dyn PostRepository>,
    storage: &'static str,
}

impl Repositories {
    fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            categories: Arc::new(InMemoryCategoryRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            storage: "memory",
        }
    }
}

impl AppState {
    /// Build the application state, falling back to in-memory storage when
    /// no database is configured or the connection fails.
    pub async fn new(db_config: Option<&DatabaseConfig>, tokens: Arc<dyn TokenService>) -> Self {
        let repos = Self::repositories(db_config).await;
        tracing::info!(storage = repos.storage, "Application state initialized");

        Self::build(repos, tokens, Arc::new(Argon2PasswordService::new()))
    }

    /// State backed entirely by in-memory repositories.
    pub fn in_memory(tokens: Arc<dyn TokenService>) -> Self {
        Self::build(
            Repositories::in_memory(),
            tokens,
            Arc::new(Argon2PasswordService::new()),
        )
    }

    fn build(
        repos: Repositories,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        let posts = PostService::new(
            repos.posts.clone(),
            repos.categories.clone(),
            repos.users.clone(),
        );
        let categories = CategoryService::new(repos.categories, repos.posts);

        Self {
            posts: Arc::new(posts),
            categories: Arc::new(categories),
            users: repos.users,
            tokens,
            passwords,
            storage: repos.storage,
        }
    }

    #[cfg(feature = "postgres")]
    async fn repositories(db_config: Option<&DatabaseConfig>) -> Repositories {
        let Some(config) = db_config else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Repositories::in_memory();
        };

        match connect(config).await {
            Ok(conn) => Repositories {
                users: Arc::new(PostgresUserRepository::new(conn.clone())),
                categories: Arc::new(PostgresCategoryRepository::new(conn.clone())),
                posts: Arc::new(PostgresPostRepository::new(conn)),
                storage: "postgres",
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to database. Using in-memory fallback.");
                Repositories::in_memory()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(db_config: Option<&DatabaseConfig>) -> Repositories {
        if db_config.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        }
        Repositories::in_memory()
    }
}
