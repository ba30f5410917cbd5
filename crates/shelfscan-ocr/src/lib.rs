#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod local;
mod pipeline;
mod provider;
mod remote;

pub use local::LocalOcr;
pub use pipeline::{OcrPipeline, PipelineHealth, ProviderStatus};
pub use provider::OcrProvider;
pub use remote::{RemoteOcr, RemoteOcrConfig};
pub use shelfscan_core::{Error, ErrorKind, Result};

/// Tracing target for OCR orchestration.
pub const TRACING_TARGET: &str = "shelfscan_ocr";
