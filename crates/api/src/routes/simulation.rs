//! Route definitions for reupholstery simulations.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::simulation;
use crate::state::AppState;

/// Two photos of up to 10 MB each plus form overhead.
pub const MAX_GENERATE_BODY_BYTES: usize = 21 * 1024 * 1024;

/// Simulation routes mounted at `/simulations`.
///
/// ```text
/// GET    /                  -> list
/// POST   /generate          -> generate
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(simulation::list)).route(
        "/generate",
        post(simulation::generate).layer(DefaultBodyLimit::max(MAX_GENERATE_BODY_BYTES)),
    )
}
