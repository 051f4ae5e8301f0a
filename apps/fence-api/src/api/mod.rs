//! API routes, nested under `/api` by `axum_helpers::create_router`.

pub mod calculations;
pub mod health;

use axum::Router;

use crate::state::AppState;

pub fn routes(state: &AppState) -> Router {
    Router::new()
        .merge(calculations::router(state))
        .merge(health::router(state.clone()))
}
