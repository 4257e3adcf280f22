use std::sync::Arc;

use auth::AccountRegistry;
use store::{Database, RideCatalog};

/// Application state shared across all handlers
pub struct AppState {
    pub db: Arc<Database>,
    pub registry: AccountRegistry,
    pub catalog: RideCatalog,
    pub jwt_secret: String,
}

impl AppState {
    pub fn new(
        db: Arc<Database>,
        registry: AccountRegistry,
        catalog: RideCatalog,
        jwt_secret: String,
    ) -> Self {
        Self {
            db,
            registry,
            catalog,
            jwt_secret,
        }
    }
}
