//! Readiness probe for the archive store

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use serde_json::Value;

use crate::state::{AppState, Storage};

type ReadyResponse = Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// 200 when the archive store answers, 503 otherwise.
async fn readiness_check(State(state): State<AppState>) -> ReadyResponse {
    let check: HealthCheckFuture = match &state.storage {
        Storage::Mongo { client, .. } => {
            let client = client.clone();
            Box::pin(async move {
                let status = database::mongodb::check_health_detailed(&client).await;
                if status.healthy {
                    Ok(())
                } else {
                    Err(status.message.unwrap_or_else(|| "ping failed".to_string()))
                }
            })
        }
        Storage::Memory => Box::pin(async { Ok(()) }),
    };

    run_health_checks(vec![(state.storage.name(), check)]).await
}
