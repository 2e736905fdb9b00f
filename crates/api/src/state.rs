use std::sync::Arc;

use reupholster_pipeline::SimulationOrchestrator;

use crate::uploads::UploadStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: reupholster_db::DbPool,
    /// Simulation pipeline, shared by all requests.
    pub orchestrator: Arc<SimulationOrchestrator>,
    /// Where uploaded images are written and how they are addressed.
    pub uploads: Arc<UploadStore>,
}
