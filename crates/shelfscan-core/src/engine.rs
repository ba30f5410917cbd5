//! The local recognition engine abstraction.
//!
//! This crate defines the lifecycle contract that on-device OCR backends
//! implement; concrete engines live outside the pipeline. Adapters own the
//! engine handle and are responsible for calling [`terminate`] when done.
//!
//! [`terminate`]: RecognitionEngine::terminate

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ImageSource;

/// Raw output of a recognition engine run.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutput {
    /// Full recognized text.
    pub text: String,
    /// Engine-reported confidence score, typically 0-100.
    pub confidence: f64,
}

impl EngineOutput {
    /// Creates a new engine output.
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// Lifecycle contract for an on-device text-recognition engine.
///
/// Callers drive the lifecycle in order: [`load_language`], [`initialize`],
/// any number of [`recognize`] calls, then [`terminate`]. Implementations
/// may make repeated lifecycle calls no-ops, but must not require it of
/// callers.
///
/// [`load_language`]: RecognitionEngine::load_language
/// [`initialize`]: RecognitionEngine::initialize
/// [`recognize`]: RecognitionEngine::recognize
/// [`terminate`]: RecognitionEngine::terminate
#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    /// Loads language data required for recognition.
    async fn load_language(&self) -> Result<()>;

    /// Initializes the engine after language data is loaded.
    async fn initialize(&self) -> Result<()>;

    /// Runs recognition on the given image.
    async fn recognize(&self, image: &ImageSource) -> Result<EngineOutput>;

    /// Releases engine resources. The engine must not be used afterwards.
    async fn terminate(&self) -> Result<()>;
}
