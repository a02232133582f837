//! FOLIO Server — Application entry point.

use folio_db::{DbConfig, DbManager};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("folio=info".parse().unwrap()))
        .json()
        .init();

    tracing::info!("Starting FOLIO server...");

    let config = DbConfig::from_env();
    let db = match DbManager::connect(&config).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(e) = folio_db::run_migrations(db.client()).await {
        tracing::error!(error = %e, "Failed to run migrations");
        std::process::exit(1);
    }

    // TODO: Start REST API server (transport layer)

    tracing::info!("FOLIO server stopped.");
}
