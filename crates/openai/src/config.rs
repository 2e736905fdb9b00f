//! Provider configuration.

use std::fmt;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_VISION_MODEL: &str = "gpt-4o";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
/// Resolution requested for every synthesized image.
pub const IMAGE_SIZE: &str = "1024x1024";
/// Quality tier requested for every synthesized image.
pub const IMAGE_QUALITY: &str = "standard";

/// Connection settings for the generation provider.
///
/// The API key is the only required value; everything else has a default.
#[derive(Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: String,
    pub vision_model: String,
    pub image_model: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OpenAIConfigError {
    #[error("OPENAI_API_KEY must be set")]
    MissingApiKey,
}

impl OpenAIConfig {
    /// Default settings with the given credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Env Var               | Default                       |
    /// |-----------------------|-------------------------------|
    /// | `OPENAI_API_KEY`      | required                      |
    /// | `OPENAI_BASE_URL`     | `https://api.openai.com/v1`   |
    /// | `OPENAI_VISION_MODEL` | `gpt-4o`                      |
    /// | `OPENAI_IMAGE_MODEL`  | `dall-e-3`                    |
    pub fn from_env() -> Result<Self, OpenAIConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, OpenAIConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("OPENAI_API_KEY").ok_or(OpenAIConfigError::MissingApiKey)?;
        let mut config = Self::new(api_key);
        if let Some(base_url) = get("OPENAI_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(model) = get("OPENAI_VISION_MODEL") {
            config.vision_model = model;
        }
        if let Some(model) = get("OPENAI_IMAGE_MODEL") {
            config.image_model = model;
        }
        Ok(config)
    }
}

impl fmt::Debug for OpenAIConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAIConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("vision_model", &self.vision_model)
            .field("image_model", &self.image_model)
            .finish()
    }
}
