#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod engine;
mod error;
pub mod types;

#[cfg(feature = "test-utils")]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

pub use engine::{EngineOutput, RecognitionEngine};
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use types::{
    Confidence, ConfidenceLevel, DateMention, ImageSource, RecognitionResult, RecognitionSource,
};
