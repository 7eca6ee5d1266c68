//! Authentication handlers.

use actix_web::{HttpResponse, web};
use validator::Validate;

use inkwell_core::domain::User;
use inkwell_core::error::RepoError;
use inkwell_core::ports::{AuthError, BaseRepository};
use inkwell_shared::ApiResponse;
use inkwell_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest};

use super::responses::user_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let email = req.email.trim().to_lowercase();
    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::BadRequest("User already exists".to_string()));
    }

    let password_hash = state.passwords.hash(&req.password)?;
    let user = User::new(req.name.trim().to_string(), email, password_hash);

    let user = state.users.save(user).await.map_err(|e| match e {
        RepoError::Constraint(_) => AppError::BadRequest("User already exists".to_string()),
        other => other.into(),
    })?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok(HttpResponse::Created().json(ApiResponse::ok(auth_response(&state, &user)?)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let user = state
        .users
        .find_by_email(&req.email.trim().to_lowercase())
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
        return Err(AuthError::InvalidCredentials.into());
    }

    Ok(HttpResponse::Ok().json(ApiResponse::ok(auth_response(&state, &user)?)))
}

/// GET /api/auth/me - Protected route
pub async fn me(identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::ok(user_response(&identity.user))))
}

fn auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = state.tokens.generate_token(user.id)?;

    Ok(AuthResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
        user: user_response(user),
    })
}
