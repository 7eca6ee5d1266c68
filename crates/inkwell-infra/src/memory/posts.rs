use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use inkwell_core::domain::{PageRequest, Post, PostFilter};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{BaseRepository, PostRepository};

/// In-memory post store. Each post, comments included, is stored whole.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        // The stored count wins; only increment_view_count moves it.
        if let Some(existing) = store.get(&post.id) {
            post.view_count = existing.view_count;
        }
        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_page(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;

        let mut matching: Vec<&Post> = store.values().filter(|p| filter.matches(p)).collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);

        Ok(matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn increment_view_count(&self, id: Uuid) -> Result<Option<u64>, RepoError> {
        let mut store = self.store.write().await;
        Ok(store.get_mut(&id).map(|post| {
            post.view_count += 1;
            post.view_count
        }))
    }

    async fn count_by_category(&self, category_id: Uuid) -> Result<u64, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .values()
            .filter(|p| p.category_id == category_id)
            .count() as u64)
    }
}
