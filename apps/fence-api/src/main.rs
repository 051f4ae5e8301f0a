use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_calculations::{PricingEngine, RateTables};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::{Config, StorageBackend};
use state::{AppState, Storage};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let rates = match &config.pricing_tables_path {
        Some(path) => {
            info!("Loading pricing tables from {}", path.display());
            RateTables::from_file(path)?
        }
        None => RateTables::default(),
    };
    let engine = PricingEngine::new(rates);

    let storage = match &config.storage {
        StorageBackend::Mongodb(mongo_config) => {
            info!("Connecting to MongoDB at {}", mongo_config.redacted_url());

            let client =
                database::mongodb::connect_from_config_with_retry(mongo_config, None).await?;
            let db = client.database(mongo_config.database());

            info!(
                "Successfully connected to MongoDB database: {}",
                mongo_config.database()
            );

            api::calculations::init_indexes(&db).await?;
            Storage::Mongo { client, db }
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage: archived calculations are lost on restart");
            Storage::Memory
        }
    };

    let state = AppState {
        config,
        engine,
        storage,
    };

    let api_routes = api::routes(&state);

    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes, &state.config.cors)?;

    let app = router.merge(health_router(state.config.app.clone()));

    info!(
        storage = state.storage.name(),
        "Starting fence pricing API with graceful shutdown (30s timeout)"
    );

    let storage = state.storage.clone();
    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            if let Storage::Mongo { client, .. } = storage {
                info!("Shutting down: closing MongoDB connections");
                client.shutdown().await;
                info!("MongoDB connection closed successfully");
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Fence pricing API shutdown complete");
    Ok(())
}
