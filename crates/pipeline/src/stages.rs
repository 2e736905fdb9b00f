//! The two provider-facing stages of a simulation run.
//!
//! Stage one turns the two embedded photos into a text description, stage
//! two renders that description into an image URL. Both are traits so the
//! orchestrator can be driven by test doubles.

use async_trait::async_trait;
use reupholster_core::image_codec::EmbeddedImage;
use reupholster_core::simulation::{
    synthesis_prompt, DESCRIBE_PROMPT, FABRIC_IMAGE_LABEL, SOURCE_IMAGE_LABEL,
};
use reupholster_openai::api::OpenAIApi;
use reupholster_openai::config::{IMAGE_QUALITY, IMAGE_SIZE};
use reupholster_openai::messages::{
    ChatCompletionRequest, ChatMessage, ContentPart, ImageGenerationRequest,
};

use crate::error::StageError;

/// Vision-to-text: describe the furniture re-covered in the fabric.
#[async_trait]
pub trait DescriptionStage: Send + Sync {
    async fn describe(
        &self,
        source: &EmbeddedImage,
        fabric: &EmbeddedImage,
    ) -> Result<String, StageError>;
}

/// Text-to-image: render a description, returning the hosted image URL.
#[async_trait]
pub trait SynthesisStage: Send + Sync {
    async fn synthesize(&self, description: &str) -> Result<String, StageError>;
}

// ---------------------------------------------------------------------------
// Request builders
// ---------------------------------------------------------------------------

/// Build the single multi-part message sent to the vision model.
///
/// Part order: instruction, furniture image, its label, fabric image, its
/// label.
pub fn description_request(
    model: &str,
    source: &EmbeddedImage,
    fabric: &EmbeddedImage,
) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![ChatMessage::user(vec![
            ContentPart::text(DESCRIBE_PROMPT),
            ContentPart::image(source.data_url()),
            ContentPart::text(SOURCE_IMAGE_LABEL),
            ContentPart::image(fabric.data_url()),
            ContentPart::text(FABRIC_IMAGE_LABEL),
        ])],
    }
}

/// Build the one-image generation request for a description.
pub fn synthesis_request(model: &str, description: &str) -> ImageGenerationRequest {
    ImageGenerationRequest {
        model: model.to_string(),
        prompt: synthesis_prompt(description),
        n: 1,
        size: IMAGE_SIZE.to_string(),
        quality: IMAGE_QUALITY.to_string(),
    }
}

// ---------------------------------------------------------------------------
// OpenAI-backed stages
// ---------------------------------------------------------------------------

/// Description stage backed by a chat-completions vision model.
pub struct OpenAIDescriber {
    api: OpenAIApi,
}

impl OpenAIDescriber {
    pub fn new(api: OpenAIApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DescriptionStage for OpenAIDescriber {
    async fn describe(
        &self,
        source: &EmbeddedImage,
        fabric: &EmbeddedImage,
    ) -> Result<String, StageError> {
        let request = description_request(&self.api.config().vision_model, source, fabric);
        let response = self.api.chat_completion(&request).await?;

        match response.first_content().map(str::trim) {
            Some(text) if !text.is_empty() => Ok(text.to_string()),
            _ => Err(StageError::Empty("description")),
        }
    }
}

/// Synthesis stage backed by the image-generations endpoint.
pub struct OpenAISynthesizer {
    api: OpenAIApi,
}

impl OpenAISynthesizer {
    pub fn new(api: OpenAIApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl SynthesisStage for OpenAISynthesizer {
    async fn synthesize(&self, description: &str) -> Result<String, StageError> {
        let request = synthesis_request(&self.api.config().image_model, description);
        let response = self.api.generate_image(&request).await?;

        match response.first_url() {
            Some(url) if !url.is_empty() => Ok(url.to_string()),
            _ => Err(StageError::Empty("image url")),
        }
    }
}
