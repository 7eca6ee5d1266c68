//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use inkwell_core::domain::{Category, PageRequest, Post, PostFilter, User};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{CategoryRepository, PostRepository, UserRepository};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// Keep PII out of the logs.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{first}***@{domain}")
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(Expr::expr(Func::lower(Expr::col(category::Column::Name))).eq(name.to_lowercase()))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Category>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = CategoryEntity::find()
            .filter(category::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_active(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::IsActive.eq(true))
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// Escape LIKE wildcards so the search term matches literally.
fn like_pattern(term: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    LikeExpr::new(escaped).escape('\\')
}

fn post_condition(filter: &PostFilter) -> Condition {
    let mut condition = Condition::all();

    if filter.published_only {
        condition = condition.add(post::Column::IsPublished.eq(true));
    }
    if let Some(category_id) = filter.category_id {
        condition = condition.add(post::Column::CategoryId.eq(category_id));
    }
    if let Some(term) = &filter.search {
        condition = condition.add(
            Condition::any()
                .add(Expr::col(post::Column::Title).ilike(like_pattern(term)))
                .add(Expr::col(post::Column::Content).ilike(like_pattern(term)))
                .add(Expr::col(post::Column::Excerpt).ilike(like_pattern(term))),
        );
    }

    condition
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_page(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post_condition(filter))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(post_condition(filter))
            .count(&self.db)
            .await
            .map_err(query_error)
    }

    async fn increment_view_count(&self, id: Uuid) -> Result<Option<u64>, RepoError> {
        let result = PostEntity::update_many()
            .col_expr(
                post::Column::ViewCount,
                Expr::col(post::Column::ViewCount).add(1),
            )
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        let post = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(post.map(|p| u64::try_from(p.view_count).unwrap_or_default()))
    }

    async fn count_by_category(&self, category_id: Uuid) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(post::Column::CategoryId.eq(category_id))
            .count(&self.db)
            .await
            .map_err(query_error)
    }
}
