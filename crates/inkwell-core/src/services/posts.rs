//! Post query and mutation service.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Category, Comment, PageRequest, Pagination, Post, PostFilter};
use crate::error::{DomainError, RepoError};
use crate::ports::{BaseRepository, CategoryRepository, PostRepository, UserRepository};

use super::Actor;
use super::views::{AuthorRef, CategoryRef, CommentView, PostView};

/// Parameters of a post listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostListQuery {
    pub page: u64,
    pub limit: u64,
    pub search: Option<String>,
    pub category_slug: Option<String>,
}

impl Default for PostListQuery {
    fn default() -> Self {
        let page = PageRequest::default();
        Self {
            page: page.page,
            limit: page.limit,
            search: None,
            category_slug: None,
        }
    }
}

/// One page of populated posts.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<PostView>,
    pub pagination: Pagination,
}

/// Fields accepted when creating or updating a post.
///
/// `category` is the raw id supplied by the client.
#[derive(Debug, Clone, Default)]
pub struct PostInput {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub is_published: bool,
}

impl PostInput {
    fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("title", "Title is required"));
        }
        if self.content.trim().is_empty() {
            return Err(DomainError::validation("content", "Content is required"));
        }
        if self.category.trim().is_empty() {
            return Err(DomainError::validation("category", "Category is required"));
        }
        Ok(())
    }
}

/// Resolved references for a batch of posts.
#[derive(Default)]
struct References {
    users: HashMap<Uuid, AuthorRef>,
    categories: HashMap<Uuid, CategoryRef>,
}

/// Listing, retrieval, mutation and commenting over the post store.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            posts,
            categories,
            users,
        }
    }

    /// List published posts, newest first.
    ///
    /// An unknown category slug yields an empty page rather than an error.
    pub async fn list(&self, query: PostListQuery) -> Result<PostPage, DomainError> {
        let page = PageRequest::new(query.page, query.limit).ok_or_else(|| {
            let field = if query.page == 0 { "page" } else { "limit" };
            DomainError::validation(field, format!("{field} must be a positive integer"))
        })?;

        let mut filter = PostFilter::published();

        if let Some(slug) = query.category_slug.as_deref().filter(|s| !s.is_empty()) {
            match self.categories.find_by_slug(slug).await? {
                Some(category) => filter = filter.in_category(category.id),
                None => {
                    tracing::debug!(category = %slug, "Unknown category slug, returning empty page");
                    return Ok(PostPage {
                        posts: Vec::new(),
                        pagination: Pagination::new(page, 0),
                    });
                }
            }
        }

        if let Some(term) = &query.search {
            filter = filter.with_search(term);
        }

        let total = self.posts.count(&filter).await?;
        let posts = if page.offset() >= total {
            Vec::new()
        } else {
            self.posts.find_page(&filter, page).await?
        };

        let refs = self.resolve(&posts, false).await?;
        let posts = posts
            .into_iter()
            .map(|post| Self::view(post, &refs, false))
            .collect();

        Ok(PostPage {
            posts,
            pagination: Pagination::new(page, total),
        })
    }

    /// Fetch a single post with comments populated, counting the view.
    pub async fn get(&self, id: Uuid) -> Result<PostView, DomainError> {
        let mut post = self.find(id).await?;

        post.view_count = self
            .posts
            .increment_view_count(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        self.populate(post).await
    }

    pub async fn create(&self, actor: Actor, input: PostInput) -> Result<PostView, DomainError> {
        input.validate()?;
        let category = self.resolve_category(&input.category).await?;

        let mut post = Post::new(actor.user_id, category.id, input.title, input.content);
        post.excerpt = input.excerpt;
        post.featured_image = input.featured_image;
        post.tags = input.tags;
        post.is_published = input.is_published;

        let post = self.posts.save(post).await?;
        tracing::info!(post_id = %post.id, author_id = %actor.user_id, "Post created");

        self.populate(post).await
    }

    /// Replace a post's editable fields. Only the author or an admin may do this.
    pub async fn update(
        &self,
        actor: Actor,
        id: Uuid,
        input: PostInput,
    ) -> Result<PostView, DomainError> {
        input.validate()?;

        let mut post = self.find(id).await?;
        authorize(&actor, &post)?;
        let category = self.resolve_category(&input.category).await?;

        post.title = input.title;
        post.content = input.content;
        post.excerpt = input.excerpt;
        post.featured_image = input.featured_image;
        post.category_id = category.id;
        post.tags = input.tags;
        post.is_published = input.is_published;
        post.updated_at = Utc::now();

        let post = self.posts.save(post).await?;
        tracing::info!(post_id = %post.id, "Post updated");

        self.populate(post).await
    }

    pub async fn delete(&self, actor: Actor, id: Uuid) -> Result<(), DomainError> {
        let post = self.find(id).await?;
        authorize(&actor, &post)?;

        self.posts.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => not_found(id),
            other => other.into(),
        })?;
        tracing::info!(post_id = %id, "Post deleted");

        Ok(())
    }

    /// Prepend a comment to the post and return it with its author resolved.
    pub async fn add_comment(
        &self,
        actor: Actor,
        post_id: Uuid,
        content: String,
    ) -> Result<CommentView, DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::validation("content", "Content is required"));
        }

        let mut post = self.find(post_id).await?;
        let comment = Comment::new(actor.user_id, content);
        post.add_comment(comment.clone());
        self.posts.save(post).await?;

        tracing::info!(post_id = %post_id, comment_id = %comment.id, "Comment added");

        let user = self.users.find_by_id(actor.user_id).await?;
        Ok(CommentView::new(comment, user.as_ref().map(AuthorRef::from)))
    }

    /// All comments on a post, newest first.
    pub async fn comments(&self, post_id: Uuid) -> Result<Vec<CommentView>, DomainError> {
        let post = self.find(post_id).await?;
        let refs = self.resolve(std::slice::from_ref(&post), true).await?;

        Ok(post
            .comments
            .into_iter()
            .map(|c| {
                let user = refs.users.get(&c.user_id).cloned();
                CommentView::new(c, user)
            })
            .collect())
    }

    async fn find(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    async fn resolve_category(&self, raw: &str) -> Result<Category, DomainError> {
        let id = Uuid::parse_str(raw.trim()).map_err(|_| DomainError::InvalidReference("category"))?;

        self.categories
            .find_by_id(id)
            .await?
            .ok_or(DomainError::InvalidReference("category"))
    }

    async fn populate(&self, post: Post) -> Result<PostView, DomainError> {
        let refs = self.resolve(std::slice::from_ref(&post), true).await?;
        Ok(Self::view(post, &refs, true))
    }

    /// Batch-load the authors and categories (and optionally commenters) of `posts`.
    async fn resolve(&self, posts: &[Post], with_comments: bool) -> Result<References, RepoError> {
        if posts.is_empty() {
            return Ok(References::default());
        }

        let mut user_ids: Vec<Uuid> = posts.iter().map(|p| p.author_id).collect();
        if with_comments {
            user_ids.extend(posts.iter().flat_map(|p| p.comments.iter().map(|c| c.user_id)));
        }
        user_ids.sort_unstable();
        user_ids.dedup();

        let mut category_ids: Vec<Uuid> = posts.iter().map(|p| p.category_id).collect();
        category_ids.sort_unstable();
        category_ids.dedup();

        let users = self
            .users
            .find_by_ids(&user_ids)
            .await?
            .iter()
            .map(|u| (u.id, AuthorRef::from(u)))
            .collect();

        let categories = self
            .categories
            .find_by_ids(&category_ids)
            .await?
            .iter()
            .map(|c| (c.id, CategoryRef::from(c)))
            .collect();

        Ok(References { users, categories })
    }

    fn view(post: Post, refs: &References, with_comments: bool) -> PostView {
        let comment_count = post.comments.len();
        let comments = with_comments.then(|| {
            post.comments
                .into_iter()
                .map(|c| {
                    let user = refs.users.get(&c.user_id).cloned();
                    CommentView::new(c, user)
                })
                .collect()
        });

        PostView {
            id: post.id,
            title: post.title,
            content: post.content,
            excerpt: post.excerpt,
            featured_image: post.featured_image,
            category: refs.categories.get(&post.category_id).cloned(),
            author: refs.users.get(&post.author_id).cloned(),
            tags: post.tags,
            is_published: post.is_published,
            view_count: post.view_count,
            comments,
            comment_count,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

fn not_found(id: Uuid) -> DomainError {
    DomainError::NotFound {
        entity_type: "Post",
        id,
    }
}

fn authorize(actor: &Actor, post: &Post) -> Result<(), DomainError> {
    if actor.is_admin || post.is_authored_by(actor.user_id) {
        Ok(())
    } else {
        tracing::warn!(post_id = %post.id, user_id = %actor.user_id, "Rejected mutation by non-author");
        Err(DomainError::Forbidden)
    }
}
