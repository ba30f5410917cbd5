//! Remote cloud text-recognition adapter.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use shelfscan_core::{Confidence, Error, ImageSource, RecognitionResult, RecognitionSource, Result};
use url::Url;

use crate::TRACING_TARGET;
use crate::provider::OcrProvider;

const DEFAULT_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

/// Configuration for the remote recognition provider.
///
/// A missing API key is a valid configuration: the provider then reports
/// itself unconfigured and yields no results, which makes the pipeline fall
/// back to the next provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(clap::Args))]
pub struct RemoteOcrConfig {
    /// API key for the cloud text-recognition service.
    #[cfg_attr(
        feature = "config",
        arg(long = "vision-api-key", env = "SHELFSCAN_VISION_API_KEY")
    )]
    #[serde(default)]
    pub api_key: Option<String>,

    /// Annotation endpoint.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "vision-endpoint",
            env = "SHELFSCAN_VISION_ENDPOINT",
            default_value = DEFAULT_ENDPOINT
        )
    )]
    #[serde(default = "default_endpoint")]
    pub endpoint: Url,

    /// Request timeout in seconds.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "vision-timeout-secs",
            env = "SHELFSCAN_VISION_TIMEOUT_SECS",
            default_value = "30"
        )
    )]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> Url {
    DEFAULT_ENDPOINT.parse().expect("default endpoint is valid")
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for RemoteOcrConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RemoteOcrConfig {
    /// Creates a configuration with the given API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }
}

// Wire shapes for the `images:annotate` contract.

#[derive(Debug, Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateEntry {
    image: AnnotateImage,
    features: Vec<AnnotateFeature>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<AnnotateImageSource>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageSource {
    image_uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateFeature {
    r#type: &'static str,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateResult {
    full_text_annotation: Option<FullTextAnnotation>,
}

#[derive(Debug, Deserialize)]
struct FullTextAnnotation {
    text: String,
}

/// Cloud text-recognition provider.
///
/// Every failure mode (missing credential, network error, non-success
/// status, missing result body) logs a warning and yields `None` so the
/// pipeline can fall back. Nothing at this layer surfaces as an error.
#[derive(Debug, Clone)]
pub struct RemoteOcr {
    http_client: reqwest::Client,
    config: RemoteOcrConfig,
}

impl RemoteOcr {
    /// Creates a remote provider from configuration.
    pub fn new(config: RemoteOcrConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|source| {
                Error::configuration()
                    .with_message("failed to build HTTP client")
                    .with_source(source)
            })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &RemoteOcrConfig {
        &self.config
    }

    async fn annotate(&self, api_key: &str, image: &ImageSource) -> Result<String> {
        let payload = build_payload(image).await?;

        let response = self
            .http_client
            .post(self.config.endpoint.clone())
            .query(&[("key", api_key)])
            .json(&payload)
            .send()
            .await
            .map_err(|source| {
                Error::network_error()
                    .with_message("annotation request failed")
                    .with_source(source)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::network_error()
                .with_message(format!("annotation request returned {status}")));
        }

        let body: AnnotateResponse = response.json().await.map_err(|source| {
            Error::serialization()
                .with_message("malformed annotation response")
                .with_source(source)
        })?;

        body.responses
            .into_iter()
            .next()
            .and_then(|result| result.full_text_annotation)
            .map(|annotation| annotation.text)
            .ok_or_else(|| {
                Error::serialization().with_message("annotation response had no text body")
            })
    }
}

#[async_trait]
impl OcrProvider for RemoteOcr {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn recognize(&self, image: &ImageSource) -> Option<RecognitionResult> {
        let Some(api_key) = self.config.api_key.clone() else {
            tracing::warn!(
                target: TRACING_TARGET,
                provider = "remote",
                "no API key configured, skipping remote recognition"
            );
            return None;
        };

        match self.annotate(&api_key, image).await {
            Ok(text) => {
                let dates = shelfscan_extract::scan_dates(&text);
                let vendors = vendor_hints(&text);
                tracing::debug!(
                    target: TRACING_TARGET,
                    provider = "remote",
                    text_len = text.len(),
                    dates = dates.len(),
                    "remote recognition succeeded"
                );
                Some(
                    RecognitionResult::new(text, RecognitionSource::Remote)
                        .with_dates(dates)
                        .with_vendors(vendors)
                        .with_confidence(Confidence::HIGH),
                )
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    provider = "remote",
                    error = %error,
                    "remote recognition failed, falling back"
                );
                None
            }
        }
    }
}

async fn build_payload(image: &ImageSource) -> Result<AnnotateRequest> {
    let annotate_image = match image.as_url() {
        Some(url) => AnnotateImage {
            content: None,
            source: Some(AnnotateImageSource {
                image_uri: url.to_string(),
            }),
        },
        None => AnnotateImage {
            content: Some(BASE64.encode(image.read_bytes().await?)),
            source: None,
        },
    };

    Ok(AnnotateRequest {
        requests: vec![AnnotateEntry {
            image: annotate_image,
            features: vec![AnnotateFeature {
                r#type: "TEXT_DETECTION",
            }],
        }],
    })
}

/// Best-effort vendor hint: the receipt header line, when present.
fn vendor_hints(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .into_iter()
        .collect()
}
