//! Read access to the `fabrics` catalog.

use reupholster_core::types::DbId;
use sqlx::PgPool;

use crate::models::fabric::Fabric;

const COLUMNS: &str = "id, name, color, image_url, created_at";

/// Lookups over the fabric catalog. Catalog writes live elsewhere.
pub struct FabricRepo;

impl FabricRepo {
    /// Find a fabric by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Fabric>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM fabrics WHERE id = $1");
        sqlx::query_as::<_, Fabric>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every fabric, alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<Fabric>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM fabrics ORDER BY name ASC");
        sqlx::query_as::<_, Fabric>(&query).fetch_all(pool).await
    }
}
