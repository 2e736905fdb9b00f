pub mod fabric;
pub mod health;
pub mod simulation;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /simulations                  history, newest first (GET)
/// /simulations/generate         run the pipeline (POST, multipart)
///
/// /fabrics                      fabric catalog (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/simulations", simulation::router())
        .nest("/fabrics", fabric::router())
}
