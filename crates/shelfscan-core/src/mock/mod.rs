//! Mock recognition engine for testing.
//!
//! Only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! shelfscan-core = { version = "...", features = ["test-utils"] }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::engine::{EngineOutput, RecognitionEngine};
use crate::error::{Error, Result};
use crate::types::ImageSource;

/// Which lifecycle stage a [`MockEngine`] should fail at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailAt {
    /// All stages succeed.
    #[default]
    Never,
    /// `load_language` returns an error.
    LoadLanguage,
    /// `initialize` returns an error.
    Initialize,
    /// `recognize` returns an error.
    Recognize,
}

/// A scriptable in-memory recognition engine.
///
/// Returns a fixed text and confidence, optionally failing at a chosen
/// lifecycle stage. Call counters allow tests to assert on lifecycle and
/// teardown behavior.
#[derive(Debug, Clone, Default)]
pub struct MockEngine {
    text: String,
    confidence: f64,
    fail_at: FailAt,
    recognize_calls: Arc<AtomicUsize>,
    terminate_calls: Arc<AtomicUsize>,
}

impl MockEngine {
    /// Creates an engine that recognizes the given text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: 91.0,
            ..Self::default()
        }
    }

    /// Sets the reported confidence score.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Makes the engine fail at the given lifecycle stage.
    pub fn failing_at(mut self, stage: FailAt) -> Self {
        self.fail_at = stage;
        self
    }

    /// Number of `recognize` calls made so far.
    pub fn recognize_calls(&self) -> usize {
        self.recognize_calls.load(Ordering::SeqCst)
    }

    /// Number of `terminate` calls made so far.
    pub fn terminate_calls(&self) -> usize {
        self.terminate_calls.load(Ordering::SeqCst)
    }

    fn fail(stage: &str) -> Error {
        Error::engine_failure().with_message(format!("mock engine failed during {stage}"))
    }
}

#[async_trait]
impl RecognitionEngine for MockEngine {
    async fn load_language(&self) -> Result<()> {
        if self.fail_at == FailAt::LoadLanguage {
            return Err(Self::fail("load_language"));
        }
        Ok(())
    }

    async fn initialize(&self) -> Result<()> {
        if self.fail_at == FailAt::Initialize {
            return Err(Self::fail("initialize"));
        }
        Ok(())
    }

    async fn recognize(&self, _image: &ImageSource) -> Result<EngineOutput> {
        self.recognize_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == FailAt::Recognize {
            return Err(Self::fail("recognize"));
        }
        Ok(EngineOutput::new(self.text.clone(), self.confidence))
    }

    async fn terminate(&self) -> Result<()> {
        self.terminate_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
