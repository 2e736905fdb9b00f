//! Test doubles for the stage and store traits.
//!
//! Compiled for this crate's own tests and, with the `testing` feature, for
//! downstream test suites.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use reupholster_core::image_codec::EmbeddedImage;
use reupholster_db::models::simulation::{CreateSimulation, Simulation};
use tracing_subscriber::fmt::MakeWriter;

use crate::error::{PersistenceError, StageError};
use crate::stages::{DescriptionStage, SynthesisStage};
use crate::store::SimulationStore;

/// Description stage returning a fixed reply and recording what it saw.
pub struct StubDescriber {
    reply: Result<String, String>,
    pub calls: AtomicUsize,
    pub seen_media_types: Mutex<Vec<String>>,
}

impl StubDescriber {
    pub fn ok(text: &str) -> Arc<Self> {
        Arc::new(Self::with(Ok(text.to_string())))
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self::with(Err(message.to_string())))
    }

    fn with(reply: Result<String, String>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            seen_media_types: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DescriptionStage for StubDescriber {
    async fn describe(
        &self,
        source: &EmbeddedImage,
        fabric: &EmbeddedImage,
    ) -> Result<String, StageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_media_types
            .lock()
            .unwrap()
            .extend([source.media_type.clone(), fabric.media_type.clone()]);
        self.reply.clone().map_err(StageError::Failed)
    }
}

/// Synthesis stage returning a fixed reply.
pub struct StubSynthesizer {
    reply: Result<String, String>,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl StubSynthesizer {
    pub fn ok(url: &str) -> Arc<Self> {
        Arc::new(Self::with(Ok(url.to_string())))
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self::with(Err(message.to_string())))
    }

    fn with(reply: Result<String, String>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SynthesisStage for StubSynthesizer {
    async fn synthesize(&self, description: &str) -> Result<String, StageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(description.to_string());
        self.reply.clone().map_err(StageError::Failed)
    }
}

/// In-memory store; optionally rejects every insert.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<Simulation>>,
    reject_inserts: bool,
    pub inserts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn rejecting() -> Arc<Self> {
        Arc::new(Self {
            reject_inserts: true,
            ..Self::default()
        })
    }

    /// A store already holding `rows`, oldest first.
    pub fn seeded(rows: Vec<Simulation>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(rows),
            ..Self::default()
        })
    }

    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    /// Snapshot of stored rows, oldest first.
    pub fn rows(&self) -> Vec<Simulation> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl SimulationStore for MemoryStore {
    async fn insert(&self, record: &CreateSimulation) -> Result<Simulation, PersistenceError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.reject_inserts {
            return Err(PersistenceError::Unavailable("connection refused".into()));
        }
        let mut rows = self.rows.lock().unwrap();
        let row = Simulation {
            id: rows.len() as i64 + 1,
            source_image_url: record.source_image_url.clone(),
            fabric_image_url: record.fabric_image_url.clone(),
            fabric_id: record.fabric_id,
            result_url: record.result_url.clone(),
            description: record.description.clone(),
            created_at: record.created_at.unwrap_or_else(Utc::now),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Simulation>, PersistenceError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .rev()
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }
}

/// Captures formatted log output for assertions.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
