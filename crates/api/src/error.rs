use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reupholster_core::error::CoreError;
use reupholster_pipeline::{PersistenceError, PipelineError};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, [`PipelineError`] for failed
/// simulation runs, and adds HTTP-specific variants. Implements
/// [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `reupholster_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A simulation run that produced no image.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Reading simulation history failed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Simulation pipeline ---
            AppError::Pipeline(err) => match err {
                PipelineError::Io(io) => {
                    tracing::error!(error = %io, "Stored image unreadable");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "IO_ERROR",
                        "A stored image could not be read".to_string(),
                    )
                }
                PipelineError::Generation { stage, cause } => {
                    tracing::error!(stage = %stage, error = %cause, "Simulation generation failed");
                    (
                        StatusCode::BAD_GATEWAY,
                        "GENERATION_FAILED",
                        format!("Simulation failed at the {stage} stage"),
                    )
                }
            },
            AppError::Persistence(err) => {
                tracing::error!(error = %err, "Simulation history unavailable");
                internal()
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let AppError::Pipeline(err) = &self {
            body["stage"] = json!(err.stage());
        }

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
