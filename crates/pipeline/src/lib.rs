//! Reupholstery simulation pipeline.
//!
//! [`SimulationOrchestrator`] embeds the furniture and fabric photos, asks a
//! vision model to describe the reupholstered result, renders that
//! description with an image model, and records the outcome through a
//! [`SimulationStore`].

pub mod error;
pub mod orchestrator;
pub mod stages;
pub mod store;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{PersistenceError, PipelineError, StageError};
pub use orchestrator::SimulationOrchestrator;
pub use stages::{DescriptionStage, OpenAIDescriber, OpenAISynthesizer, SynthesisStage};
pub use store::{PgSimulationStore, SimulationStore};
