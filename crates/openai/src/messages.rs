//! Wire types for the chat-completions and image-generations endpoints.
//!
//! Only the fields the simulation pipeline sends or reads are modelled;
//! unknown response fields are ignored by serde.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Chat completions
// ---------------------------------------------------------------------------

/// Body of `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// A single multi-part chat message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Vec<ContentPart>,
}

impl ChatMessage {
    pub fn user(content: Vec<ContentPart>) -> Self {
        Self {
            role: "user".to_string(),
            content,
        }
    }
}

/// One part of a multi-part message: text or an image reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// An image part. `url` may be hosted or a `data:` URL.
    pub fn image(url: impl Into<String>) -> Self {
        Self::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Response of `POST /chat/completions`.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    /// `null` when the model refused or returned only tool calls.
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if present.
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first()?.message.content.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Image generations
// ---------------------------------------------------------------------------

/// Body of `POST /images/generations`.
#[derive(Debug, Clone, Serialize)]
pub struct ImageGenerationRequest {
    pub model: String,
    pub prompt: String,
    pub n: u8,
    pub size: String,
    pub quality: String,
}

/// Response of `POST /images/generations`.
#[derive(Debug, Deserialize)]
pub struct ImageGenerationResponse {
    #[serde(default)]
    pub data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
pub struct GeneratedImage {
    /// Provider-hosted, time-limited URL.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub revised_prompt: Option<String>,
}

impl ImageGenerationResponse {
    /// URL of the first generated image, if present.
    pub fn first_url(&self) -> Option<&str> {
        self.data.first()?.url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn content_parts_serialize_with_type_tag() {
        let message = ChatMessage::user(vec![
            ContentPart::text("describe"),
            ContentPart::image("data:image/jpeg;base64,QUJD"),
        ]);
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!({
                "role": "user",
                "content": [
                    { "type": "text", "text": "describe" },
                    { "type": "image_url", "image_url": { "url": "data:image/jpeg;base64,QUJD" } }
                ]
            })
        );
    }

    #[test]
    fn chat_response_reads_first_choice() {
        let raw = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"A grey sofa"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.first_content(), Some("A grey sofa"));
    }

    #[test]
    fn chat_response_with_null_content_or_no_choices() {
        let null: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(null.first_content(), None);

        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(empty.first_content(), None);
    }

    #[test]
    fn image_response_reads_first_url() {
        let raw = r#"{"created":1,"data":[{"url":"https://cdn.example/out123.png","revised_prompt":"p"}]}"#;
        let parsed: ImageGenerationResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.first_url(), Some("https://cdn.example/out123.png"));

        let b64_only: ImageGenerationResponse =
            serde_json::from_str(r#"{"data":[{"b64_json":"QUJD"}]}"#).unwrap();
        assert_eq!(b64_only.first_url(), None);
    }
}
