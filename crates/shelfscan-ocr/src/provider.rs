//! The provider contract shared by all OCR adapters.

use async_trait::async_trait;
use shelfscan_core::{ImageSource, RecognitionResult};

/// A text-recognition provider.
///
/// Providers are capability-equivalent and interchangeable: each either
/// yields a [`RecognitionResult`] or `None`, where `None` means "nothing
/// usable here, try the next provider", an expected outcome rather than an error.
/// A provider that can always produce a (possibly degraded) result returns
/// `Some` unconditionally and ends the chain.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    /// Short provider name for logs and health reporting.
    fn name(&self) -> &'static str;

    /// Whether the provider has the configuration it needs to run.
    fn is_configured(&self) -> bool {
        true
    }

    /// Attempts recognition on the given image.
    async fn recognize(&self, image: &ImageSource) -> Option<RecognitionResult>;
}
