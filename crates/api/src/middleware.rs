use std::sync::Arc;

use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};

use auth::{AuthError, Claims, verify_token};

use crate::AppState;
use crate::error::ErrorResponse;

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingToken)
}

/// Auth gate for mutating routes: extract the bearer token, verify it, and
/// attach the resolved claims to the request. Missing, invalid, and expired
/// tokens all answer 401 without saying which.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let claims = bearer_token(request.headers())
        .and_then(|token| verify_token(token, &state.jwt_secret))
        .map_err(|_| {
            let body = ErrorResponse {
                error: "not authenticated".to_string(),
            };
            (StatusCode::UNAUTHORIZED, Json(body)).into_response()
        })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Extractor handing the verified identity to handlers behind `require_auth`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                let body = ErrorResponse {
                    error: "not authenticated".to_string(),
                };
                (StatusCode::UNAUTHORIZED, Json(body))
            })
    }
}
