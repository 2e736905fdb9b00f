//! Handlers for the `/fabrics` catalog (read-only).

use axum::extract::State;
use axum::Json;
use reupholster_db::models::fabric::Fabric;
use reupholster_db::repositories::FabricRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/fabrics
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Fabric>>>> {
    let fabrics = FabricRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: fabrics }))
}
