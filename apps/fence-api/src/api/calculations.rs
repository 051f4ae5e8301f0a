//! Wires the calculations domain to the configured archive store.

use axum::Router;
use domain_calculations::{
    CalculationService, InMemoryCalculationRepository, MongoCalculationRepository, handlers,
};
use mongodb::Database;

use crate::state::{AppState, Storage};

pub fn router(state: &AppState) -> Router {
    let engine = state.engine.clone();

    match &state.storage {
        Storage::Mongo { db, .. } => {
            let repository = MongoCalculationRepository::new(db);
            handlers::router(CalculationService::new(engine, repository))
        }
        Storage::Memory => {
            let repository = InMemoryCalculationRepository::new();
            handlers::router(CalculationService::new(engine, repository))
        }
    }
}

pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoCalculationRepository::new(db).init_indexes().await?;
    Ok(())
}
