//! Repository for the `simulations` table.

use sqlx::PgPool;

use crate::models::simulation::{CreateSimulation, Simulation};

const COLUMNS: &str =
    "id, source_image_url, fabric_image_url, fabric_id, result_url, description, created_at";

/// Append-only access to simulation history. There is no update path.
pub struct SimulationRepo;

impl SimulationRepo {
    /// Insert a finished simulation, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSimulation,
    ) -> Result<Simulation, sqlx::Error> {
        let query = format!(
            "INSERT INTO simulations
                (source_image_url, fabric_image_url, fabric_id, result_url, description, created_at)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, now()))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Simulation>(&query)
            .bind(&input.source_image_url)
            .bind(&input.fabric_image_url)
            .bind(input.fabric_id)
            .bind(&input.result_url)
            .bind(&input.description)
            .bind(input.created_at)
            .fetch_one(pool)
            .await
    }

    /// The `limit` most recent simulations, newest first.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<Simulation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM simulations
             ORDER BY created_at DESC, id DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, Simulation>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
