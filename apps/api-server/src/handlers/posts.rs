//! Post handlers.

use actix_web::{HttpResponse, web};
use validator::Validate;

use inkwell_core::services::{PostInput, PostListQuery};
use inkwell_shared::ApiResponse;
use inkwell_shared::dto::{CommentRequest, PostListParams, PostRequest};

use super::parse_id;
use super::responses::{comment_response, pagination_meta, post_response};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

const POST: &str = "Post";

/// GET /api/posts?page&limit&search&category
pub async fn list(
    state: web::Data<AppState>,
    params: web::Query<PostListParams>,
) -> AppResult<HttpResponse> {
    let params = params.into_inner();
    let defaults = PostListQuery::default();

    let page = state
        .posts
        .list(PostListQuery {
            page: params.page.unwrap_or(defaults.page),
            limit: params.limit.unwrap_or(defaults.limit),
            search: params.search,
            category_slug: params.category,
        })
        .await?;

    let posts: Vec<_> = page.posts.into_iter().map(post_response).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(posts, pagination_meta(page.pagination))))
}

/// GET /api/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = parse_id(&path, POST)?;
    let post = state.posts.get(id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(post))))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let post = state.posts.create(identity.actor(), post_input(req)).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(post_response(post))))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;
    let id = parse_id(&path, POST)?;

    let post = state
        .posts
        .update(identity.actor(), id, post_input(req))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(post))))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path, POST)?;
    state.posts.delete(identity.actor(), id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::Map::new())))
}

/// POST /api/posts/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;
    let id = parse_id(&path, POST)?;

    let comment = state
        .posts
        .add_comment(identity.actor(), id, req.content)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(comment_response(comment))))
}

/// GET /api/posts/{id}/comments
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path, POST)?;
    let comments: Vec<_> = state
        .posts
        .comments(id)
        .await?
        .into_iter()
        .map(comment_response)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(comments)))
}

fn post_input(req: PostRequest) -> PostInput {
    PostInput {
        title: req.title,
        content: req.content,
        excerpt: req.excerpt,
        featured_image: req.featured_image,
        category: req.category,
        tags: req.tags,
        is_published: req.is_published,
    }
}
