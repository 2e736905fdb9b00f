//! Reupholstery simulation domain: request/result types, pipeline states
//! and the fixed prompts sent to the generation providers.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

/// Instruction sent ahead of the two images in the description stage.
pub const DESCRIBE_PROMPT: &str = "You are an expert in interior design and furniture reupholstery. \
Analyze the two images below:\n\
1st image: a sofa (or armchair/chair) that will be reupholstered.\n\
2nd image: the fabric that will be used for the reupholstery.\n\n\
Describe in DETAIL how the reupholstered furniture would look with this fabric. \
Mention the exact color, the texture, the fabric pattern and how it adapts to the shape of the furniture. \
Your description will be used to generate a realistic image.";

/// Label placed after the furniture image.
pub const SOURCE_IMAGE_LABEL: &str = "Image 1: original furniture";

/// Label placed after the fabric image.
pub const FABRIC_IMAGE_LABEL: &str = "Image 2: fabric for the reupholstery";

/// Realism directive prepended to the stage-one description.
pub const SYNTHESIS_PREFIX: &str = "Realistic photo of a reupholstered piece of furniture. ";

/// Style directive appended after the stage-one description.
pub const SYNTHESIS_STYLE: &str =
    "\nStyle: professional photography, natural lighting, modern setting.";

/// Wrap a stage-one description into the image-synthesis prompt.
pub fn synthesis_prompt(description: &str) -> String {
    format!("{SYNTHESIS_PREFIX}{description}{SYNTHESIS_STYLE}")
}

// ---------------------------------------------------------------------------
// Stages and states
// ---------------------------------------------------------------------------

/// The pipeline step an error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStage {
    /// Reading and embedding the two local images.
    Encode,
    /// Vision-to-text description of the reupholstered result.
    Describe,
    /// Text-to-image rendering of the description.
    Synthesize,
}

impl SimulationStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Encode => "encode",
            Self::Describe => "describe",
            Self::Synthesize => "synthesize",
        }
    }
}

impl fmt::Display for SimulationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a single run in the linear simulation pipeline.
///
/// ```text
/// Idle -> ImagesEncoded -> Described -> Synthesized -> Persisted -> Done
///   \________________\___________\____________\-> Failed(stage)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    Idle,
    ImagesEncoded,
    Described,
    Synthesized,
    Persisted,
    Done,
    Failed(SimulationStage),
}

impl SimulationState {
    /// The only state reachable on success, or `None` for terminal states.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::ImagesEncoded),
            Self::ImagesEncoded => Some(Self::Described),
            Self::Described => Some(Self::Synthesized),
            Self::Synthesized => Some(Self::Persisted),
            Self::Persisted => Some(Self::Done),
            Self::Done | Self::Failed(_) => None,
        }
    }

    /// The stage whose failure leaves this state.
    ///
    /// `Synthesized -> Persisted` has none: persistence is best-effort and
    /// never fails the run.
    pub fn failing_stage(self) -> Option<SimulationStage> {
        match self {
            Self::Idle => Some(SimulationStage::Encode),
            Self::ImagesEncoded => Some(SimulationStage::Describe),
            Self::Described => Some(SimulationStage::Synthesize),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }
}

// ---------------------------------------------------------------------------
// Request / result
// ---------------------------------------------------------------------------

/// A stored upload: where it lives on disk and the URL it is served under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub path: PathBuf,
    pub url: String,
}

/// Input to one simulation run. Both images must already be stored.
#[derive(Debug, Clone)]
pub struct SimulationRequest {
    pub source: ImageRef,
    pub fabric: ImageRef,
    /// Catalog fabric the fabric photo came from, if any.
    pub fabric_id: Option<DbId>,
}

/// Outcome of a successful run. Write-once.
///
/// `persisted` is `false` when generation succeeded but the history write
/// failed (degraded success); `id` is only set when it was persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub id: Option<DbId>,
    pub source_image_url: String,
    pub fabric_image_url: String,
    pub fabric_id: Option<DbId>,
    pub result_image_url: String,
    pub description: String,
    pub created_at: Timestamp,
    pub persisted: bool,
}
