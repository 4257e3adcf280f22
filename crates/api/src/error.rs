use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use auth::AuthError;
use store::CatalogError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Service failures mapped onto transport statuses. Internal failures are
/// logged and answered with a generic message only.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Auth(e) => match e {
                AuthError::Validation(_) => (StatusCode::BAD_REQUEST, e.to_string()),
                AuthError::EmailTaken => (StatusCode::CONFLICT, e.to_string()),
                AuthError::BadCredentials => (StatusCode::UNAUTHORIZED, e.to_string()),
                // Token failure modes are not distinguished to the caller.
                AuthError::MissingToken | AuthError::InvalidToken | AuthError::ExpiredToken => {
                    (StatusCode::UNAUTHORIZED, "not authenticated".to_string())
                }
                AuthError::Hashing(_) | AuthError::TokenIssuance(_) | AuthError::Store(_) => {
                    internal(&self)
                }
            },
            ApiError::Catalog(e) => match e {
                CatalogError::Validation(_) => (StatusCode::BAD_REQUEST, e.to_string()),
                CatalogError::Store(_) => internal(&self),
            },
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

fn internal(error: &ApiError) -> (StatusCode, String) {
    tracing::error!(%error, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal server error".to_string(),
    )
}
