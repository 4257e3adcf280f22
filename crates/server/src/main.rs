use std::sync::Arc;

use api::{AppState, router};
use auth::AccountRegistry;
use rideboard_core::AppConfig;
use store::{Database, RideCatalog};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    let db = Arc::new(Database::new(&config.store.path));
    let registry = AccountRegistry::new(
        db.clone(),
        config.auth.jwt_secret.clone(),
        config.auth.token_expiry_seconds,
    );
    let catalog = RideCatalog::new(db.clone());
    let state = Arc::new(AppState::new(db, registry, catalog, config.auth.jwt_secret));

    let app = router::router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };

    info!("listening on http://{addr}");
    if let Err(e) = axum::serve(listener, app).await {
        error!("server error: {e}");
        std::process::exit(1);
    }
}
