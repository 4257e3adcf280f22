use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};

use crate::error::ErrorResponse;
use crate::{AppState, auth_handlers, debug_handlers, middleware as auth_middleware, ride_handlers};

pub fn router(state: Arc<AppState>) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/", get(|| async { "rideboard API running" }))
        .route("/auth/register", post(auth_handlers::register))
        .route("/auth/login", post(auth_handlers::login))
        .route("/rides", get(ride_handlers::list_rides))
        .route("/debug/db", get(debug_handlers::db_snapshot));

    // Mutating ride routes sit behind the auth gate
    let protected_routes = Router::new()
        .route("/rides", post(ride_handlers::create_ride))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "route not found".to_string(),
        }),
    )
}
