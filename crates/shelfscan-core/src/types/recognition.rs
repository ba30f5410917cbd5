//! Recognition result types shared by all providers.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, IntoStaticStr};

/// Which provider produced a recognition result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecognitionSource {
    /// Cloud text-recognition provider.
    Remote,
    /// On-device recognition engine.
    Local,
}

/// Discrete confidence levels reported by providers without a numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    /// Recognition is unreliable.
    Low,
    /// Recognition is usable but may contain mistakes.
    Medium,
    /// Recognition is trustworthy.
    High,
}

/// Confidence attached to a recognition result.
///
/// Serializes as either a level string (`"low"`, `"medium"`, `"high"`) or a
/// bare number, matching what the underlying providers report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Confidence {
    /// A discrete level.
    Level(ConfidenceLevel),
    /// A numeric score as reported by the engine (typically 0-100).
    Score(f64),
}

impl Confidence {
    /// Low discrete confidence.
    pub const LOW: Self = Self::Level(ConfidenceLevel::Low);
    /// Medium discrete confidence.
    pub const MEDIUM: Self = Self::Level(ConfidenceLevel::Medium);
    /// High discrete confidence.
    pub const HIGH: Self = Self::Level(ConfidenceLevel::High);

    /// Creates a numeric confidence from an engine score.
    pub fn from_score(score: f64) -> Self {
        Self::Score(score)
    }
}

/// A date found in recognized text.
///
/// `parsed` is always a valid calendar date; mentions that fail calendar
/// validation are omitted at extraction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateMention {
    /// The substring as it appeared in the text.
    pub raw: String,
    /// The parsed ISO date.
    pub parsed: Date,
}

/// Output of one recognition attempt.
///
/// Produced fresh per invocation and never mutated after return; the caller
/// that requested it owns it exclusively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    /// Full recognized text.
    pub text: String,
    /// Dates found in the text, in encounter order.
    #[serde(default)]
    pub dates: Vec<DateMention>,
    /// Best-effort vendor/store hints. May be empty.
    #[serde(default)]
    pub vendors: Vec<String>,
    /// Confidence reported by the provider, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    /// Which provider produced this result.
    pub source: RecognitionSource,
    /// Human-readable failure description when recognition degraded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecognitionResult {
    /// Creates a result with recognized text and no hints.
    pub fn new(text: impl Into<String>, source: RecognitionSource) -> Self {
        Self {
            text: text.into(),
            dates: Vec::new(),
            vendors: Vec::new(),
            confidence: None,
            source,
            error: None,
        }
    }

    /// Creates an error-shaped result: empty text, no hints, `error` set.
    pub fn from_error(message: impl Into<String>, source: RecognitionSource) -> Self {
        Self {
            text: String::new(),
            dates: Vec::new(),
            vendors: Vec::new(),
            confidence: None,
            source,
            error: Some(message.into()),
        }
    }

    /// Sets date mentions.
    pub fn with_dates(mut self, dates: Vec<DateMention>) -> Self {
        self.dates = dates;
        self
    }

    /// Sets vendor hints.
    pub fn with_vendors(mut self, vendors: Vec<String>) -> Self {
        self.vendors = vendors;
        self
    }

    /// Sets the confidence.
    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Returns true if this result carries a failure description.
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_serializes_as_level_or_number() {
        let level = serde_json::to_value(Confidence::HIGH).unwrap();
        assert_eq!(level, serde_json::json!("high"));

        let score = serde_json::to_value(Confidence::from_score(87.5)).unwrap();
        assert_eq!(score, serde_json::json!(87.5));
    }

    #[test]
    fn confidence_round_trips() {
        let parsed: Confidence = serde_json::from_value(serde_json::json!("medium")).unwrap();
        assert_eq!(parsed, Confidence::MEDIUM);

        let parsed: Confidence = serde_json::from_value(serde_json::json!(42.0)).unwrap();
        assert_eq!(parsed, Confidence::Score(42.0));
    }

    #[test]
    fn source_tags_are_lowercase() {
        assert_eq!(
            serde_json::to_value(RecognitionSource::Remote).unwrap(),
            serde_json::json!("remote")
        );
        let tag: &'static str = RecognitionSource::Local.into();
        assert_eq!(tag, "local");
    }

    #[test]
    fn error_shaped_result_is_degraded() {
        let result = RecognitionResult::from_error("engine exploded", RecognitionSource::Local);
        assert!(result.is_degraded());
        assert!(result.text.is_empty());
        assert!(result.confidence.is_none());
    }
}
