//! Category handlers.

use actix_web::{HttpResponse, web};
use validator::Validate;

use inkwell_core::services::CategoryInput;
use inkwell_shared::ApiResponse;
use inkwell_shared::dto::CategoryRequest;

use super::parse_id;
use super::responses::category_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

const CATEGORY: &str = "Category";

/// GET /api/categories - active categories sorted by name.
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories: Vec<_> = state
        .categories
        .list_active()
        .await?
        .into_iter()
        .map(category_response)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(categories)))
}

/// GET /api/categories/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = parse_id(&path, CATEGORY)?;
    let category = state.categories.get(id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(category_response(category))))
}

/// POST /api/categories
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let category = state.categories.create(category_input(req)).await?;
    tracing::debug!(user_id = %identity.user.id, category_id = %category.id, "Category created via API");

    Ok(HttpResponse::Created().json(ApiResponse::ok(category_response(category))))
}

/// PUT /api/categories/{id}
pub async fn update(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;
    let id = parse_id(&path, CATEGORY)?;

    let category = state.categories.update(id, category_input(req)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(category_response(category))))
}

/// DELETE /api/categories/{id}
pub async fn delete(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path, CATEGORY)?;
    state.categories.delete(id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::Map::new())))
}

fn category_input(req: CategoryRequest) -> CategoryInput {
    CategoryInput {
        name: req.name,
        description: req.description,
        color: req.color,
        is_active: req.is_active,
    }
}
