//! HTTP surface over the registry, catalog, and store.

pub mod auth_handlers;
pub mod debug_handlers;
pub mod error;
pub mod middleware;
pub mod ride_handlers;
pub mod router;
pub mod state;

pub use state::AppState;
