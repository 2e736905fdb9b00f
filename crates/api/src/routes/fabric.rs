use axum::routing::get;
use axum::Router;

use crate::handlers::fabric;
use crate::state::AppState;

/// Fabric catalog routes mounted at `/fabrics`.
///
/// ```text
/// GET    /                  -> list
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(fabric::list))
}
