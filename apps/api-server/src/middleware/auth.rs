//! Bearer-token authentication extractor.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures::future::LocalBoxFuture;

use inkwell_core::domain::User;
use inkwell_core::ports::{AuthError, BaseRepository};
use inkwell_core::services::Actor;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// The authenticated user, loaded fresh from the store on every request.
///
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.user.name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user: User,
}

impl Identity {
    pub fn actor(&self) -> Actor {
        Actor::new(self.user.id, self.user.is_admin())
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = bearer_token(req);

        Box::pin(async move {
            let state =
                state.ok_or_else(|| AppError::Internal("AppState not registered".to_string()))?;
            let token = token?;

            let claims = state.tokens.validate_token(&token).map_err(|e| {
                tracing::debug!(error = %e, "Rejected bearer token");
                AppError::from(e)
            })?;

            let user = state.users.find_by_id(claims.user_id).await?.ok_or_else(|| {
                tracing::debug!(user_id = %claims.user_id, "Token subject no longer exists");
                AppError::from(AuthError::InvalidToken("unknown subject".to_string()))
            })?;

            Ok(Identity { user })
        })
    }
}

/// Token from `Authorization: Bearer <token>`. A bare token is accepted too.
fn bearer_token(req: &HttpRequest) -> Result<String, AppError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken("non-ASCII authorization header".to_string()))?;

    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        return Err(AuthError::MissingAuth.into());
    }

    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_missing_header() {
        let req = TestRequest::default().to_http_request();
        assert!(
            matches!(bearer_token(&req), Err(AppError::Unauthorized(m)) if m == "No token, authorization denied")
        );
    }

    #[test]
    fn test_strips_bearer_prefix() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc.def"))
            .to_http_request();
        assert_eq!(bearer_token(&req).unwrap(), "abc.def");
    }

    #[test]
    fn test_empty_bearer_is_missing() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer "))
            .to_http_request();
        assert!(bearer_token(&req).is_err());
    }
}
