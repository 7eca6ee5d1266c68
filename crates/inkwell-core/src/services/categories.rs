//! Category management.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Category, slugify};
use crate::error::{DomainError, RepoError};
use crate::ports::{BaseRepository, CategoryRepository, PostRepository};

/// Fields accepted when creating or updating a category.
///
/// `is_active` is ignored on create and left unchanged on update when `None`.
#[derive(Debug, Clone, Default)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub is_active: Option<bool>,
}

impl CategoryInput {
    /// Trimmed name and its slug.
    fn normalized(&self) -> Result<(String, String), DomainError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name", "Name is required"));
        }
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(DomainError::validation(
                "name",
                "Name must contain at least one letter or digit",
            ));
        }
        Ok((name.to_string(), slug))
    }
}

pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
    posts: Arc<dyn PostRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { categories, posts }
    }

    pub async fn list_active(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.categories.list_active().await?)
    }

    /// Fetch any category, active or not.
    pub async fn get(&self, id: Uuid) -> Result<Category, DomainError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, input: CategoryInput) -> Result<Category, DomainError> {
        let (name, slug) = input.normalized()?;
        self.ensure_unique(&name, &slug, None).await?;

        let category = Category::new(name, input.description, input.color);
        let category = self.categories.save(category).await.map_err(duplicate)?;
        tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");

        Ok(category)
    }

    pub async fn update(&self, id: Uuid, input: CategoryInput) -> Result<Category, DomainError> {
        let (name, slug) = input.normalized()?;
        let mut category = self.get(id).await?;
        self.ensure_unique(&name, &slug, Some(id)).await?;

        category.rename(name);
        category.description = input.description;
        category.color = input.color;
        if let Some(active) = input.is_active {
            category.is_active = active;
        }
        category.updated_at = Utc::now();

        let category = self.categories.save(category).await.map_err(duplicate)?;
        tracing::info!(category_id = %category.id, "Category updated");

        Ok(category)
    }

    /// Delete a category. Refused while any post still references it.
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let category = self.get(id).await?;

        let in_use = self.posts.count_by_category(category.id).await?;
        if in_use > 0 {
            tracing::debug!(category_id = %id, posts = in_use, "Refusing to delete category in use");
            return Err(DomainError::InUse("Category is in use".to_string()));
        }

        self.categories.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => not_found(id),
            other => other.into(),
        })?;
        tracing::info!(category_id = %id, "Category deleted");

        Ok(())
    }

    /// Names collide case-insensitively, and so do their slugs.
    async fn ensure_unique(
        &self,
        name: &str,
        slug: &str,
        except: Option<Uuid>,
    ) -> Result<(), DomainError> {
        let by_name = self.categories.find_by_name(name).await?;
        let by_slug = self.categories.find_by_slug(slug).await?;

        let taken = [by_name, by_slug]
            .into_iter()
            .flatten()
            .any(|existing| Some(existing.id) != except);

        if taken {
            return Err(DomainError::Duplicate("Category already exists".to_string()));
        }
        Ok(())
    }
}

fn not_found(id: Uuid) -> DomainError {
    DomainError::NotFound {
        entity_type: "Category",
        id,
    }
}

/// A unique index tripping between the check and the write is still a duplicate.
fn duplicate(err: RepoError) -> DomainError {
    match err {
        RepoError::Constraint(_) => DomainError::Duplicate("Category already exists".to_string()),
        other => other.into(),
    }
}
