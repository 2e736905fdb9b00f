//! Simulation history rows.

use reupholster_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `simulations` table. Rows are never updated.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Simulation {
    pub id: DbId,
    pub source_image_url: String,
    pub fabric_image_url: String,
    pub fabric_id: Option<DbId>,
    pub result_url: String,
    pub description: String,
    pub created_at: Timestamp,
}

/// DTO for recording a finished simulation.
#[derive(Debug, Clone)]
pub struct CreateSimulation {
    pub source_image_url: String,
    pub fabric_image_url: String,
    pub fabric_id: Option<DbId>,
    pub result_url: String,
    pub description: String,
    /// When the run finished; the column default is used if `None`.
    pub created_at: Option<Timestamp>,
}
