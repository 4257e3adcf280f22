use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use store::{AccountView, RideListing};

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugSnapshot {
    pub account_count: usize,
    pub listing_count: usize,
    pub accounts: Vec<AccountView>,
    pub listings: Vec<RideListing>,
}

/// GET /debug/db - operator snapshot of the store. Accounts are rendered
/// through their public view, so password hashes cannot leak here.
pub async fn db_snapshot(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.db.load().await;
    Json(DebugSnapshot {
        account_count: store.accounts.len(),
        listing_count: store.listings.len(),
        accounts: store.accounts.iter().map(AccountView::from).collect(),
        listings: store.listings,
    })
}
