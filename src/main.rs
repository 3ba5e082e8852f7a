//! # Syndicate API Main Entry Point
//!
//! This is the main entry point for the Syndicate API service.

use syndicate::{config::ConfigLoader, db, server::run_server, telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from layered env files and variables
    let config_loader = ConfigLoader::new();
    let config = config_loader.load()?;
    config.validate()?;

    telemetry::init_tracing(&config)?;

    tracing::info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "Effective configuration");
    }

    let db = db::init_pool(&config).await?;

    // Bring the schema up to date before accepting traffic
    use migration::{Migrator, MigratorTrait};
    Migrator::up(&db, None).await?;

    run_server(config, db).await
}
