//! Ordered provider fallback chain.

use std::sync::Arc;

use serde::Serialize;
use shelfscan_core::{ImageSource, RecognitionResult, RecognitionSource};

use crate::TRACING_TARGET;
use crate::provider::OcrProvider;

/// Runs recognition providers in order until one yields a usable result.
///
/// The chain's only decision is "did this provider produce a result,
/// yes/no": there is no retry loop and no timeout composition here. Each
/// provider owns its failure handling. The conventional chain is remote
/// first, then local; adding providers requires no caller changes.
#[derive(Clone, Default)]
pub struct OcrPipeline {
    providers: Vec<Arc<dyn OcrProvider>>,
}

impl OcrPipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a provider to the end of the chain.
    pub fn with_provider<P>(mut self, provider: P) -> Self
    where
        P: OcrProvider + 'static,
    {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Appends a shared provider handle to the end of the chain.
    pub fn with_shared_provider(mut self, provider: Arc<dyn OcrProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Number of providers in the chain.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// True if the chain has no providers.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Runs the chain over an image and returns the first usable result.
    ///
    /// Always returns a well-shaped result: if every provider falls through,
    /// the result is error-shaped rather than a panic or an `Err`.
    pub async fn run(&self, image: &ImageSource) -> RecognitionResult {
        for provider in &self.providers {
            tracing::debug!(
                target: TRACING_TARGET,
                provider = provider.name(),
                configured = provider.is_configured(),
                "attempting recognition"
            );

            if let Some(result) = provider.recognize(image).await {
                tracing::debug!(
                    target: TRACING_TARGET,
                    provider = provider.name(),
                    source = result.source.as_ref(),
                    degraded = result.is_degraded(),
                    "provider produced a result"
                );
                return result;
            }

            tracing::warn!(
                target: TRACING_TARGET,
                provider = provider.name(),
                "provider yielded no result, falling through"
            );
        }

        RecognitionResult::from_error(
            "no recognition provider produced a result",
            RecognitionSource::Local,
        )
    }

    /// Reports which providers are present and configured.
    pub fn health(&self) -> PipelineHealth {
        PipelineHealth {
            providers: self
                .providers
                .iter()
                .map(|provider| ProviderStatus {
                    name: provider.name(),
                    configured: provider.is_configured(),
                })
                .collect(),
        }
    }
}

/// Provider inventory for health reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineHealth {
    /// Chain members in evaluation order.
    pub providers: Vec<ProviderStatus>,
}

/// Status of one chain member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    /// Provider name.
    pub name: &'static str,
    /// Whether the provider has the configuration it needs.
    pub configured: bool,
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use shelfscan_core::mock::MockEngine;

    use super::*;
    use crate::local::LocalOcr;
    use crate::remote::{RemoteOcr, RemoteOcrConfig};

    /// Provider that never yields a result.
    struct Silent;

    #[async_trait]
    impl OcrProvider for Silent {
        fn name(&self) -> &'static str {
            "silent"
        }

        fn is_configured(&self) -> bool {
            false
        }

        async fn recognize(&self, _image: &ImageSource) -> Option<RecognitionResult> {
            None
        }
    }

    /// Provider that always yields a fixed result.
    struct Fixed(&'static str, RecognitionSource);

    #[async_trait]
    impl OcrProvider for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn recognize(&self, _image: &ImageSource) -> Option<RecognitionResult> {
            Some(RecognitionResult::new(self.0, self.1))
        }
    }

    #[tokio::test]
    async fn first_usable_result_wins() {
        let pipeline = OcrPipeline::new()
            .with_provider(Fixed("first", RecognitionSource::Remote))
            .with_provider(Fixed("second", RecognitionSource::Local));

        let result = pipeline.run(&ImageSource::from_bytes(&b"img"[..])).await;
        assert_eq!(result.text, "first");
        assert_eq!(result.source, RecognitionSource::Remote);
    }

    #[tokio::test]
    async fn silent_providers_fall_through() {
        let pipeline = OcrPipeline::new()
            .with_provider(Silent)
            .with_provider(Fixed("fallback", RecognitionSource::Local));

        let result = pipeline.run(&ImageSource::from_bytes(&b"img"[..])).await;
        assert_eq!(result.text, "fallback");
        assert_eq!(result.source, RecognitionSource::Local);
    }

    #[tokio::test]
    async fn unconfigured_remote_falls_back_to_local() {
        let remote = RemoteOcr::new(RemoteOcrConfig::default()).unwrap();
        let local = LocalOcr::new(MockEngine::with_text("HOME DEPOT\n11/12/2025"));
        let pipeline = OcrPipeline::new()
            .with_provider(remote)
            .with_provider(local);

        let result = pipeline.run(&ImageSource::from_bytes(&b"img"[..])).await;
        assert_eq!(result.source, RecognitionSource::Local);
        assert!(result.error.is_none());
        assert_eq!(result.dates.len(), 1);
    }

    #[tokio::test]
    async fn exhausted_chain_yields_error_shape() {
        let pipeline = OcrPipeline::new().with_provider(Silent);
        let result = pipeline.run(&ImageSource::from_bytes(&b"img"[..])).await;
        assert!(result.is_degraded());
        assert!(result.text.is_empty());
    }

    #[tokio::test]
    async fn health_reports_chain_order_and_configuration() {
        let pipeline = OcrPipeline::new()
            .with_provider(Silent)
            .with_provider(Fixed("x", RecognitionSource::Local));

        let health = pipeline.health();
        assert_eq!(health.providers.len(), 2);
        assert_eq!(health.providers[0].name, "silent");
        assert!(!health.providers[0].configured);
        assert!(health.providers[1].configured);
    }
}
