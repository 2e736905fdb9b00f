//! Fabric catalog rows.

use reupholster_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `fabrics` table.
///
/// `image_url` is the public `/uploads/...` path of the swatch photo.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Fabric {
    pub id: DbId,
    pub name: String,
    pub color: Option<String>,
    pub image_url: String,
    pub created_at: Timestamp,
}
