//! Persistence gateway for simulation history.

use async_trait::async_trait;
use reupholster_db::models::simulation::{CreateSimulation, Simulation};
use reupholster_db::repositories::SimulationRepo;
use reupholster_db::DbPool;

use crate::error::PersistenceError;

/// Append-only store of finished simulations.
///
/// Implementations must accept concurrent `insert` calls.
#[async_trait]
pub trait SimulationStore: Send + Sync {
    async fn insert(&self, record: &CreateSimulation) -> Result<Simulation, PersistenceError>;

    /// The `limit` most recent records, newest first.
    async fn list_recent(&self, limit: i64) -> Result<Vec<Simulation>, PersistenceError>;
}

/// [`SimulationStore`] over the Postgres `simulations` table.
#[derive(Clone)]
pub struct PgSimulationStore {
    pool: DbPool,
}

impl PgSimulationStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SimulationStore for PgSimulationStore {
    async fn insert(&self, record: &CreateSimulation) -> Result<Simulation, PersistenceError> {
        Ok(SimulationRepo::create(&self.pool, record).await?)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Simulation>, PersistenceError> {
        Ok(SimulationRepo::list_recent(&self.pool, limit).await?)
    }
}
