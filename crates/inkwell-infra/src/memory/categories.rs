use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use inkwell_core::domain::Category;
use inkwell_core::error::RepoError;
use inkwell_core::ports::{BaseRepository, CategoryRepository};

/// In-memory category store. Slugs are unique.
#[derive(Default)]
pub struct InMemoryCategoryRepository {
    store: RwLock<HashMap<Uuid, Category>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, category: Category) -> Result<Category, RepoError> {
        let mut store = self.store.write().await;

        if store
            .values()
            .any(|existing| existing.id != category.id && existing.slug == category.slug)
        {
            return Err(RepoError::Constraint(format!(
                "slug '{}' already taken",
                category.slug
            )));
        }

        store.insert(category.id, category.clone());
        Ok(category)
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
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|c| c.slug == slug).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError> {
        let needle = name.to_lowercase();
        let store = self.store.read().await;
        Ok(store
            .values()
            .find(|c| c.name.to_lowercase() == needle)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Category>, RepoError> {
        let store = self.store.read().await;
        Ok(ids.iter().filter_map(|id| store.get(id).cloned()).collect())
    }

    async fn list_active(&self) -> Result<Vec<Category>, RepoError> {
        let store = self.store.read().await;
        let mut active: Vec<Category> = store.values().filter(|c| c.is_active).cloned().collect();
        active.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(active)
    }
}
