//! Handlers for the `/simulations` resource.
//!
//! `POST /generate` accepts the two photos as multipart, stores them, and
//! runs the simulation pipeline synchronously. A run takes tens of seconds;
//! the router's timeout layer bounds it.

use std::path::Path;

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;
use reupholster_core::error::CoreError;
use reupholster_core::image_codec::media_type_for_path;
use reupholster_core::pagination::{clamp_limit, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};
use reupholster_core::simulation::{ImageRef, SimulationRequest, SimulationResult};
use reupholster_core::types::DbId;
use reupholster_db::models::fabric::Fabric;
use reupholster_db::models::simulation::Simulation;
use reupholster_db::repositories::FabricRepo;

use crate::error::{AppError, AppResult};
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// An uploaded file held in memory until the whole form is validated.
struct UploadedFile {
    filename: String,
    data: Vec<u8>,
}

/// Where the fabric photo for a run comes from.
enum FabricInput {
    Upload(UploadedFile),
    Catalog(ImageRef),
}

/// Parsed `POST /generate` form.
#[derive(Default)]
struct GenerateForm {
    source: Option<UploadedFile>,
    fabric: Option<UploadedFile>,
    fabric_id: Option<DbId>,
}

/// POST /api/v1/simulations/generate
///
/// Multipart fields:
/// - `source` (or `sofa`): photo of the furniture
/// - `fabric`: photo of the fabric, optional when `fabric_id` is given
/// - `fabric_id`: catalog fabric; its stored photo is used if no `fabric` file is sent
///
/// A `fabric_id` must name an existing catalog fabric; it is checked before
/// anything is stored or sent to the provider.
///
/// Returns 201 with the result even when the history write failed; the
/// `persisted` flag reports that case.
pub async fn generate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<SimulationResult>>)> {
    let form = read_form(multipart).await?;

    let source_file = form
        .source
        .ok_or_else(|| AppError::BadRequest("Missing required 'source' image".into()))?;

    let catalog_fabric = match form.fabric_id {
        Some(id) => Some(find_fabric(&state, id).await?),
        None => None,
    };

    let fabric = match (form.fabric, catalog_fabric) {
        (Some(file), _) => FabricInput::Upload(file),
        (None, Some(fabric)) => FabricInput::Catalog(catalog_fabric_image(&state, &fabric)?),
        (None, None) => {
            return Err(AppError::BadRequest(
                "Missing required 'fabric' image or 'fabric_id'".into(),
            ))
        }
    };

    let source = store_upload(&state, &source_file).await?;
    let fabric = match fabric {
        FabricInput::Upload(file) => store_upload(&state, &file).await?,
        FabricInput::Catalog(image) => image,
    };

    let request = SimulationRequest {
        source,
        fabric,
        fabric_id: form.fabric_id,
    };
    let result = state.orchestrator.generate(&request).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: result })))
}

/// GET /api/v1/simulations?limit=
///
/// Most recent simulations first. `limit` defaults to 50, max 100.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<Vec<Simulation>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT);
    let simulations = state.orchestrator.history(limit).await?;
    Ok(Json(DataResponse { data: simulations }))
}

// ---- private helpers ----

async fn read_form(mut multipart: Multipart) -> AppResult<GenerateForm> {
    let mut form = GenerateForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "source" | "sofa" | "fabric" => {
                let filename = field.file_name().unwrap_or("upload.jpg").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                // Browsers send an empty part for an untouched file input.
                if data.is_empty() {
                    continue;
                }
                // The extension labels the payload for the provider.
                if media_type_for_path(Path::new(&filename)).is_none() {
                    return Err(AppError::BadRequest(format!(
                        "Image '{filename}' has no file extension"
                    )));
                }
                let file = Some(UploadedFile {
                    filename,
                    data: data.to_vec(),
                });
                if name == "fabric" {
                    form.fabric = file;
                } else {
                    form.source = file;
                }
            }
            "fabric_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let text = text.trim();
                if !text.is_empty() {
                    let id = text.parse::<DbId>().map_err(|_| {
                        AppError::BadRequest(format!("Invalid fabric_id '{text}'"))
                    })?;
                    form.fabric_id = Some(id);
                }
            }
            _ => {} // ignore unknown fields
        }
    }

    Ok(form)
}

async fn store_upload(state: &AppState, file: &UploadedFile) -> AppResult<ImageRef> {
    state
        .uploads
        .save(&file.filename, &file.data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store upload: {e}")))
}

/// Look up a catalog fabric, 404 if it does not exist.
async fn find_fabric(state: &AppState, id: DbId) -> AppResult<Fabric> {
    FabricRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Fabric",
            id,
        }))
}

/// Resolve a catalog fabric to its stored photo.
fn catalog_fabric_image(state: &AppState, fabric: &Fabric) -> AppResult<ImageRef> {
    state.uploads.resolve(&fabric.image_url).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Fabric {} has no locally stored image",
            fabric.id
        )))
    })
}
