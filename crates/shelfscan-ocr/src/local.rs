//! Local on-device recognition adapter.

use std::sync::Arc;

use async_trait::async_trait;
use shelfscan_core::{
    Confidence, ImageSource, RecognitionEngine, RecognitionResult, RecognitionSource, Result,
};
use tokio::sync::OnceCell;

use crate::TRACING_TARGET;
use crate::provider::OcrProvider;

/// Local recognition provider driving an on-device engine.
///
/// The engine handle is owned by the adapter and initialized lazily on the
/// first recognition, not at process scope; [`shutdown`] tears it down
/// explicitly. A failed initialization is retried on the next call.
///
/// This provider always yields a result: engine failures at any stage come
/// back as an error-shaped [`RecognitionResult`] so the caller still gets a
/// well-shaped object instead of a propagated failure.
///
/// [`shutdown`]: LocalOcr::shutdown
pub struct LocalOcr {
    engine: Arc<dyn RecognitionEngine>,
    started: OnceCell<()>,
}

impl LocalOcr {
    /// Creates a local provider around the given engine.
    pub fn new<E>(engine: E) -> Self
    where
        E: RecognitionEngine + 'static,
    {
        Self {
            engine: Arc::new(engine),
            started: OnceCell::new(),
        }
    }

    /// Creates a local provider from a shared engine handle.
    pub fn from_shared(engine: Arc<dyn RecognitionEngine>) -> Self {
        Self {
            engine,
            started: OnceCell::new(),
        }
    }

    /// Tears down the engine if it was ever started.
    pub async fn shutdown(&self) -> Result<()> {
        if self.started.initialized() {
            self.engine.terminate().await?;
        }
        Ok(())
    }

    async fn ensure_started(&self) -> Result<()> {
        self.started
            .get_or_try_init(|| async {
                tracing::debug!(
                    target: TRACING_TARGET,
                    provider = "local",
                    "initializing recognition engine"
                );
                self.engine.load_language().await?;
                self.engine.initialize().await?;
                Ok(())
            })
            .await
            .copied()
    }

    async fn run(&self, image: &ImageSource) -> Result<RecognitionResult> {
        self.ensure_started().await?;
        let output = self.engine.recognize(image).await?;

        let fields = shelfscan_extract::parse_receipt_text(
            &output.text,
            Some(Confidence::from_score(output.confidence)),
        );

        Ok(RecognitionResult::new(output.text, RecognitionSource::Local)
            .with_dates(fields.dates)
            .with_vendors(fields.store_name.into_iter().collect())
            .with_confidence(Confidence::from_score(output.confidence)))
    }
}

#[async_trait]
impl OcrProvider for LocalOcr {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn recognize(&self, image: &ImageSource) -> Option<RecognitionResult> {
        match self.run(image).await {
            Ok(result) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    provider = "local",
                    text_len = result.text.len(),
                    "local recognition succeeded"
                );
                Some(result)
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    provider = "local",
                    error = %error,
                    "local recognition failed, returning degraded result"
                );
                Some(RecognitionResult::from_error(
                    error.to_string(),
                    RecognitionSource::Local,
                ))
            }
        }
    }
}
