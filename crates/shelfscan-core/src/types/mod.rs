//! Shared data types for the recognition pipeline.

mod image;
mod recognition;

pub use image::ImageSource;
pub use recognition::{
    Confidence, ConfidenceLevel, DateMention, RecognitionResult, RecognitionSource,
};
