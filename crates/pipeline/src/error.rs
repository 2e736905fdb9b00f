//! Pipeline error taxonomy.
//!
//! [`PipelineError`] aborts a run and names the stage that failed.
//! [`PersistenceError`] never aborts a run: the orchestrator logs it and
//! still returns the generated image.

use reupholster_core::image_codec::ImageReadError;
use reupholster_core::simulation::SimulationStage;
use reupholster_openai::api::OpenAIApiError;

/// Failure of a single provider call.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// Transport or provider-side failure (timeout, 401, 429, bad JSON...).
    #[error(transparent)]
    Provider(#[from] OpenAIApiError),

    /// The provider answered but the field we need was missing or blank.
    #[error("provider returned an empty {0}")]
    Empty(&'static str),

    /// Any other failure reported by a stage implementation.
    #[error("{0}")]
    Failed(String),
}

/// A simulation run that did not produce an image.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A local image could not be read.
    #[error(transparent)]
    Io(#[from] ImageReadError),

    /// A generation stage failed or returned an unusable result.
    #[error("Generation failed at {stage} stage: {cause}")]
    Generation {
        stage: SimulationStage,
        #[source]
        cause: StageError,
    },
}

impl PipelineError {
    pub fn generation(stage: SimulationStage, cause: impl Into<StageError>) -> Self {
        Self::Generation {
            stage,
            cause: cause.into(),
        }
    }

    /// The stage this failure is attributed to.
    pub fn stage(&self) -> SimulationStage {
        match self {
            Self::Io(_) => SimulationStage::Encode,
            Self::Generation { stage, .. } => *stage,
        }
    }
}

/// Writing to or reading from simulation history failed.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
