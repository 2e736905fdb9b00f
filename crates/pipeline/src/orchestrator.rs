//! Linear state machine driving one simulation run.
//!
//! ```text
//! Idle -> ImagesEncoded -> Described -> Synthesized -> Persisted -> Done
//! ```
//!
//! Encoding and both generation stages abort the run with a
//! [`PipelineError`] naming the stage. Persistence is best-effort: a failed
//! history write is logged and the generated image is still returned with
//! `persisted = false`. Each external call is attempted exactly once and no
//! deadline is applied here; callers bound the whole run.

use std::sync::Arc;

use chrono::Utc;
use reupholster_core::image_codec::{self, EmbeddedImage};
use reupholster_core::simulation::{
    SimulationRequest, SimulationResult, SimulationStage, SimulationState,
};
use reupholster_db::models::simulation::{CreateSimulation, Simulation};
use reupholster_db::DbPool;
use reupholster_openai::api::OpenAIApi;

use crate::error::{PersistenceError, PipelineError, StageError};
use crate::stages::{DescriptionStage, OpenAIDescriber, OpenAISynthesizer, SynthesisStage};
use crate::store::{PgSimulationStore, SimulationStore};

/// Sequences the description and synthesis stages and records the result.
///
/// Holds no per-run state, so one instance is shared across requests.
#[derive(Clone)]
pub struct SimulationOrchestrator {
    describer: Arc<dyn DescriptionStage>,
    synthesizer: Arc<dyn SynthesisStage>,
    store: Arc<dyn SimulationStore>,
}

/// Tracks the state of a single run and logs every transition.
struct SimulationRun {
    state: SimulationState,
}

impl SimulationRun {
    fn start() -> Self {
        Self {
            state: SimulationState::Idle,
        }
    }

    fn advance(&mut self, next: SimulationState) {
        debug_assert_eq!(self.state.next(), Some(next), "out-of-order transition");
        tracing::debug!(from = ?self.state, to = ?next, "Simulation state transition");
        self.state = next;
    }

    fn fail(&mut self, error: PipelineError) -> PipelineError {
        let stage = error.stage();
        debug_assert_eq!(self.state.failing_stage(), Some(stage), "stage/state mismatch");
        tracing::warn!(
            state = ?self.state,
            stage = %stage,
            error = %error,
            "Simulation failed"
        );
        self.state = SimulationState::Failed(stage);
        error
    }
}

impl SimulationOrchestrator {
    pub fn new(
        describer: Arc<dyn DescriptionStage>,
        synthesizer: Arc<dyn SynthesisStage>,
        store: Arc<dyn SimulationStore>,
    ) -> Self {
        Self {
            describer,
            synthesizer,
            store,
        }
    }

    /// Wire both stages to one provider account and history to Postgres.
    pub fn with_openai(api: OpenAIApi, pool: DbPool) -> Self {
        Self::new(
            Arc::new(OpenAIDescriber::new(api.clone())),
            Arc::new(OpenAISynthesizer::new(api)),
            Arc::new(PgSimulationStore::new(pool)),
        )
    }

    /// Run the full pipeline for one request.
    ///
    /// Returns either a fully populated [`SimulationResult`] or an error
    /// attributed to exactly one stage. Nothing is persisted unless both
    /// generation stages succeeded.
    #[tracing::instrument(
        skip_all,
        fields(run_id = %uuid::Uuid::new_v4(), fabric_id = ?request.fabric_id)
    )]
    pub async fn generate(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationResult, PipelineError> {
        let mut run = SimulationRun::start();

        let (source, fabric) = match encode_pair(request).await {
            Ok(images) => images,
            Err(e) => return Err(run.fail(e)),
        };
        run.advance(SimulationState::ImagesEncoded);

        let description = match self.describe(&source, &fabric).await {
            Ok(text) => text,
            Err(e) => return Err(run.fail(e)),
        };
        run.advance(SimulationState::Described);

        let result_image_url = match self.synthesize(&description).await {
            Ok(url) => url,
            Err(e) => return Err(run.fail(e)),
        };
        run.advance(SimulationState::Synthesized);

        let record = CreateSimulation {
            source_image_url: request.source.url.clone(),
            fabric_image_url: request.fabric.url.clone(),
            fabric_id: request.fabric_id,
            result_url: result_image_url.clone(),
            description: description.clone(),
            created_at: Some(Utc::now()),
        };
        let (id, created_at, persisted) = match self.store.insert(&record).await {
            Ok(row) => (Some(row.id), row.created_at, true),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    result_url = %result_image_url,
                    "Simulation generated but not persisted"
                );
                (None, record.created_at.unwrap_or_else(Utc::now), false)
            }
        };
        run.advance(SimulationState::Persisted);
        run.advance(SimulationState::Done);

        tracing::info!(id = ?id, persisted, "Simulation complete");

        Ok(SimulationResult {
            id,
            source_image_url: record.source_image_url,
            fabric_image_url: record.fabric_image_url,
            fabric_id: record.fabric_id,
            result_image_url,
            description,
            created_at,
            persisted,
        })
    }

    /// Most recent simulations, newest first.
    pub async fn history(&self, limit: i64) -> Result<Vec<Simulation>, PersistenceError> {
        self.store.list_recent(limit).await
    }

    async fn describe(
        &self,
        source: &EmbeddedImage,
        fabric: &EmbeddedImage,
    ) -> Result<String, PipelineError> {
        let text = self
            .describer
            .describe(source, fabric)
            .await
            .map_err(|e| PipelineError::generation(SimulationStage::Describe, e))?;

        let text = text.trim();
        if text.is_empty() {
            return Err(PipelineError::generation(
                SimulationStage::Describe,
                StageError::Empty("description"),
            ));
        }
        Ok(text.to_string())
    }

    async fn synthesize(&self, description: &str) -> Result<String, PipelineError> {
        let url = self
            .synthesizer
            .synthesize(description)
            .await
            .map_err(|e| PipelineError::generation(SimulationStage::Synthesize, e))?;

        if url.trim().is_empty() {
            return Err(PipelineError::generation(
                SimulationStage::Synthesize,
                StageError::Empty("image url"),
            ));
        }
        Ok(url)
    }
}

async fn encode_pair(
    request: &SimulationRequest,
) -> Result<(EmbeddedImage, EmbeddedImage), PipelineError> {
    let source = image_codec::encode(&request.source.path).await?;
    let fabric = image_codec::encode(&request.fabric.path).await?;
    Ok((source, fabric))
}
