use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use thiserror::Error;

use crate::db::{Database, StoreError};
use crate::model::RideListing;

/// Upper bound for seats on a single listing.
pub const MAX_SEATS: u32 = 8;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Verified identity of the account publishing a listing, handed in
/// explicitly by the caller rather than pulled from ambient request state.
#[derive(Debug, Clone)]
pub struct OwnerIdentity {
    pub id: i64,
    pub name: String,
}

/// Fields supplied by a client for a new listing, before validation.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub origin: String,
    pub destination: String,
    pub date: String,
    pub price: f64,
    pub available_seats: Option<u32>,
}

/// Conjunctive search filter; an absent field matches everything.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub date: Option<String>,
}

impl SearchFilter {
    fn matches(&self, listing: &RideListing) -> bool {
        let origin_ok = self
            .origin
            .as_deref()
            .is_none_or(|needle| contains_ci(&listing.origin, needle));
        let destination_ok = self
            .destination
            .as_deref()
            .is_none_or(|needle| contains_ci(&listing.destination, needle));
        let date_ok = self.date.as_deref().is_none_or(|date| listing.date == date);
        origin_ok && destination_ok && date_ok
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Validates and appends ride listings, and answers search queries.
pub struct RideCatalog {
    db: Arc<Database>,
}

impl RideCatalog {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Publish a new listing on behalf of `owner`.
    ///
    /// Validation happens before the store is touched; the append and
    /// persist run as one critical section, so a persist failure means the
    /// listing was not created.
    pub async fn publish(
        &self,
        draft: NewListing,
        owner: &OwnerIdentity,
    ) -> Result<RideListing, CatalogError> {
        let origin = required(&draft.origin, "from")?;
        let destination = required(&draft.destination, "to")?;
        let date = normalized_date(&draft.date)?;

        if !draft.price.is_finite() || draft.price <= 0.0 {
            return Err(CatalogError::Validation(
                "price must be greater than zero".to_string(),
            ));
        }
        let price = (draft.price * 100.0).round() / 100.0;

        let available_seats = draft.available_seats.unwrap_or(1);
        if !(1..=MAX_SEATS).contains(&available_seats) {
            return Err(CatalogError::Validation(format!(
                "availableSeats must be between 1 and {MAX_SEATS}"
            )));
        }

        let driver = owner.name.clone();
        let driver_id = owner.id;

        self.db
            .update(move |store| {
                let listing = RideListing {
                    id: store.next_listing_id(),
                    origin,
                    destination,
                    date,
                    price,
                    available_seats,
                    driver,
                    driver_id,
                    created_at: Utc::now(),
                };
                store.listings.push(listing.clone());
                Ok(listing)
            })
            .await
    }

    /// Search published listings. Read-only; results keep insertion order.
    pub async fn search(&self, filter: &SearchFilter) -> Vec<RideListing> {
        let store = self.db.load().await;
        store
            .listings
            .into_iter()
            .filter(|listing| filter.matches(listing))
            .collect()
    }
}

fn required(value: &str, field: &str) -> Result<String, CatalogError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CatalogError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

/// Dates are calendar days; anything that parses as `YYYY-MM-DD` is
/// re-emitted in canonical zero-padded form so exact-match search works.
fn normalized_date(date: &str) -> Result<String, CatalogError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map(|d| d.to_string())
        .map_err(|_| CatalogError::Validation("date must be a YYYY-MM-DD calendar day".to_string()))
}
