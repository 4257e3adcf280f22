//! Durable record store and ride catalog
//!
//! Provides:
//! - The single JSON-backed store of accounts and ride listings
//! - Atomic whole-store load/save with a serialized mutation path
//! - Validation and search over published ride listings

pub mod catalog;
pub mod db;
pub mod model;

pub use catalog::{CatalogError, NewListing, OwnerIdentity, RideCatalog, SearchFilter};
pub use db::{Database, StoreError};
pub use model::{Account, AccountView, RideListing, Store};
