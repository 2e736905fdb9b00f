//! REST API client for the OpenAI-compatible HTTP endpoints.
//!
//! Wraps `POST /chat/completions` and `POST /images/generations` using
//! [`reqwest`]. Each call is a single attempt; retries are left to callers.

use crate::config::OpenAIConfig;
use crate::messages::{
    ChatCompletionRequest, ChatCompletionResponse, ImageGenerationRequest,
    ImageGenerationResponse,
};

/// HTTP client for one provider account.
#[derive(Clone)]
pub struct OpenAIApi {
    client: reqwest::Client,
    config: OpenAIConfig,
}

/// Errors from the provider REST layer.
#[derive(Debug, thiserror::Error)]
pub enum OpenAIApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code (rate limit, auth, ...).
    #[error("Provider API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl OpenAIApiError {
    /// HTTP status for provider-side failures, `None` for transport errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            Self::ApiError { status, .. } => Some(*status),
        }
    }
}

impl OpenAIApi {
    pub fn new(config: OpenAIConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: OpenAIConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    /// Send a chat completion request.
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, OpenAIApiError> {
        tracing::debug!(model = %request.model, "Sending chat completion request");
        let response = self
            .client
            .post(self.url("chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Request image generation.
    pub async fn generate_image(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse, OpenAIApiError> {
        tracing::debug!(
            model = %request.model,
            size = %request.size,
            quality = %request.quality,
            "Sending image generation request"
        );
        let response = self
            .client
            .post(self.url("images/generations"))
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'))
    }

    /// Ensure the response has a success status code, otherwise capture
    /// the status and body text in [`OpenAIApiError::ApiError`].
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, OpenAIApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(OpenAIApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, OpenAIApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::messages::{ChatMessage, ContentPart};

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn api_for(base_url: String) -> OpenAIApi {
        let mut config = OpenAIConfig::new("sk-test");
        config.base_url = base_url;
        OpenAIApi::new(config)
    }

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "Bearer sk-test")
    }

    async fn chat_handler(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
        if !authorized(&headers) {
            return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})));
        }
        let echoed = body["messages"][0]["content"][0]["text"].clone();
        (
            StatusCode::OK,
            Json(json!({ "choices": [ { "message": { "role": "assistant", "content": echoed } } ] })),
        )
    }

    async fn image_handler(Json(body): Json<Value>) -> Json<Value> {
        assert_eq!(body["n"], 1);
        assert_eq!(body["size"], "1024x1024");
        Json(json!({ "data": [ { "url": "https://cdn.example/out123.png" } ] }))
    }

    #[tokio::test]
    async fn chat_completion_sends_bearer_and_parses_choice() {
        let base = spawn_server(Router::new().route("/chat/completions", post(chat_handler))).await;
        let api = api_for(base);

        let request = ChatCompletionRequest {
            model: "gpt-4o".into(),
            messages: vec![ChatMessage::user(vec![ContentPart::text("hello sofa")])],
        };
        let response = api.chat_completion(&request).await.unwrap();
        assert_eq!(response.first_content(), Some("hello sofa"));
    }

    #[tokio::test]
    async fn generate_image_parses_url() {
        let base =
            spawn_server(Router::new().route("/images/generations", post(image_handler))).await;
        let api = api_for(format!("{base}/"));

        let request = ImageGenerationRequest {
            model: "dall-e-3".into(),
            prompt: "a sofa".into(),
            n: 1,
            size: "1024x1024".into(),
            quality: "standard".into(),
        };
        let response = api.generate_image(&request).await.unwrap();
        assert_eq!(response.first_url(), Some("https://cdn.example/out123.png"));
    }

    #[tokio::test]
    async fn non_success_status_becomes_api_error() {
        let router = Router::new().route(
            "/images/generations",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "rate limited") }),
        );
        let api = api_for(spawn_server(router).await);

        let request = ImageGenerationRequest {
            model: "dall-e-3".into(),
            prompt: "a sofa".into(),
            n: 1,
            size: "1024x1024".into(),
            quality: "standard".into(),
        };
        let err = api.generate_image(&request).await.unwrap_err();
        assert_eq!(err.status(), Some(429));
        match err {
            OpenAIApiError::ApiError { body, .. } => assert_eq!(body, "rate limited"),
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_request_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = api_for(format!("http://{addr}"));
        let request = ChatCompletionRequest {
            model: "gpt-4o".into(),
            messages: vec![],
        };
        let err = api.chat_completion(&request).await.unwrap_err();
        assert!(matches!(err, OpenAIApiError::Request(_)));
        assert_eq!(err.status(), None);
    }
}
