#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use reupholster_api::config::ServerConfig;
use reupholster_api::router::build_app_router;
use reupholster_api::state::AppState;
use reupholster_api::uploads::UploadStore;
use reupholster_pipeline::testing::{MemoryStore, StubDescriber, StubSynthesizer};
use reupholster_pipeline::SimulationOrchestrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

pub const DESCRIPTION: &str = "A grey velvet sofa with soft texture";
pub const RESULT_URL: &str = "https://cdn.example/out123.png";

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Everything a test needs to drive and inspect one app instance.
pub struct TestApp {
    pub router: Router,
    pub upload_dir: TempDir,
    pub describer: Arc<StubDescriber>,
    pub synthesizer: Arc<StubSynthesizer>,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    /// Number of files written to the upload directory.
    pub fn stored_upload_count(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path()).unwrap().count()
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(upload_dir: &TempDir) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        upload_dir: upload_dir.path().to_path_buf(),
    }
}

/// A pool that never connects unless a handler actually queries it.
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .connect_lazy("postgres://postgres@127.0.0.1:1/unused")
        .unwrap()
}

fn describer(reply: Result<&str, &str>) -> Arc<StubDescriber> {
    match reply {
        Ok(text) => StubDescriber::ok(text),
        Err(message) => StubDescriber::failing(message),
    }
}

fn synthesizer(reply: Result<&str, &str>) -> Arc<StubSynthesizer> {
    match reply {
        Ok(url) => StubSynthesizer::ok(url),
        Err(message) => StubSynthesizer::failing(message),
    }
}

/// Build the full app with stubbed stages and store and no database.
pub fn build_test_app(
    describe: Result<&str, &str>,
    synthesize: Result<&str, &str>,
    store: Arc<MemoryStore>,
) -> TestApp {
    build_test_app_with_pool(lazy_pool(), describe, synthesize, store)
}

pub fn build_test_app_with_pool(
    pool: PgPool,
    describe: Result<&str, &str>,
    synthesize: Result<&str, &str>,
    store: Arc<MemoryStore>,
) -> TestApp {
    let upload_dir = tempfile::tempdir().unwrap();
    let config = test_config(&upload_dir);

    let describer = describer(describe);
    let synthesizer = synthesizer(synthesize);
    let orchestrator =
        SimulationOrchestrator::new(describer.clone(), synthesizer.clone(), store.clone());

    let state = AppState {
        pool,
        orchestrator: Arc::new(orchestrator),
        uploads: Arc::new(UploadStore::new(upload_dir.path())),
    };

    TestApp {
        router: build_app_router(state, &config),
        upload_dir,
        describer,
        synthesizer,
        store,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "reupholster-test-boundary";

/// One multipart form field.
pub enum Part<'a> {
    File {
        name: &'a str,
        filename: &'a str,
        bytes: &'a [u8],
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
}

/// Build a `multipart/form-data` POST request.
pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::File {
                name,
                filename,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Send a GET request through the router.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send any request through the router.
pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as bytes.
pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
