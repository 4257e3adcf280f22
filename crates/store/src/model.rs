use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account as persisted in the store.
///
/// The password hash lives only in this type and the durable document; the
/// outward shape is [`AccountView`], which omits it structurally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Public view of an account, safe to serialize onto the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
            created_at: account.created_at,
        }
    }
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        account.clone().into()
    }
}

/// A published ride offer.
///
/// `origin` and `destination` keep the `from`/`to` names on the wire and in
/// the durable document. Driver name and id are denormalized from the owning
/// account at publish time and never updated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideListing {
    pub id: i64,
    #[serde(rename = "from")]
    pub origin: String,
    #[serde(rename = "to")]
    pub destination: String,
    pub date: String,
    pub price: f64,
    pub available_seats: u32,
    pub driver: String,
    pub driver_id: i64,
    pub created_at: DateTime<Utc>,
}

/// The whole durable aggregate. Always loaded and rewritten as one unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Store {
    pub accounts: Vec<Account>,
    pub listings: Vec<RideListing>,
}

impl Store {
    /// Next identifier for a new account, unique within this store snapshot.
    pub fn next_account_id(&self) -> i64 {
        next_id(self.accounts.iter().map(|a| a.id))
    }

    /// Next identifier for a new listing, unique within this store snapshot.
    pub fn next_listing_id(&self) -> i64 {
        next_id(self.listings.iter().map(|l| l.id))
    }
}

/// Time-derived id, bumped past the current maximum so that records created
/// within the same millisecond still get distinct values.
fn next_id(existing: impl Iterator<Item = i64>) -> i64 {
    let candidate = Utc::now().timestamp_millis();
    match existing.max() {
        Some(max) if candidate <= max => max + 1,
        _ => candidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: i64) -> Account {
        Account {
            id,
            name: "Test".to_string(),
            email: format!("test{id}@example.com"),
            password_hash: "$2b$10$hash".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn next_id_is_time_derived_on_empty_store() {
        let store = Store::default();
        let before = Utc::now().timestamp_millis();
        let id = store.next_account_id();
        assert!(id >= before);
    }

    #[test]
    fn next_id_bumps_past_existing_maximum() {
        let far_future = Utc::now().timestamp_millis() + 1_000_000;
        let store = Store {
            accounts: vec![account(far_future)],
            listings: vec![],
        };
        assert_eq!(store.next_account_id(), far_future + 1);
    }

    #[test]
    fn account_view_has_no_hash_field() {
        let view = AccountView::from(account(1));
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "test1@example.com");
    }

    #[test]
    fn listing_serializes_with_wire_names() {
        let listing = RideListing {
            id: 7,
            origin: "Helsinki".to_string(),
            destination: "Tampere".to_string(),
            date: "2024-01-01".to_string(),
            price: 25.5,
            available_seats: 3,
            driver: "Ada".to_string(),
            driver_id: 1,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["from"], "Helsinki");
        assert_eq!(json["to"], "Tampere");
        assert_eq!(json["availableSeats"], 3);
        assert_eq!(json["driverId"], 1);
    }

    #[test]
    fn store_deserializes_missing_sections_as_empty() {
        let store: Store = serde_json::from_str("{}").unwrap();
        assert!(store.accounts.is_empty());
        assert!(store.listings.is_empty());
    }
}
