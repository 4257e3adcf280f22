use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use store::{NewListing, OwnerIdentity, RideListing, SearchFilter};

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRideRequest {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub price: f64,
    #[serde(rename = "availableSeats")]
    pub available_seats: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CreateRideResponse {
    pub ride: RideListing,
}

/// GET /rides - search published listings, open to everyone.
pub async fn list_rides(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let filter = SearchFilter {
        origin: params.from,
        destination: params.to,
        date: params.date,
    };
    Json(state.catalog.search(&filter).await)
}

/// POST /rides - publish a listing; identity comes from the auth gate.
pub async fn create_ride(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<CreateRideRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let owner = OwnerIdentity {
        id: claims.id,
        name: claims.name,
    };
    let draft = NewListing {
        origin: payload.from,
        destination: payload.to,
        date: payload.date,
        price: payload.price,
        available_seats: payload.available_seats,
    };

    let ride = state.catalog.publish(draft, &owner).await?;
    Ok((StatusCode::CREATED, Json(CreateRideResponse { ride })))
}
