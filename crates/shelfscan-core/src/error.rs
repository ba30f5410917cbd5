//! Common error type definitions.

use strum::{AsRefStr, IntoStaticStr};
use thiserror::Error as ThisError;

/// Type alias for boxed dynamic errors that can be sent across threads.
///
/// Commonly used as a source error in structured error types, wrapping any
/// error that implements the standard `Error` trait while keeping Send and
/// Sync bounds for multi-threaded contexts.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of errors that can occur in shelfscan operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Input validation failed.
    InvalidInput,
    /// Configuration error (missing credential, malformed endpoint).
    Configuration,
    /// Network-related error occurred.
    NetworkError,
    /// A recognition engine failed during load, init, or recognition.
    EngineFailure,
    /// File I/O error reading an image.
    Io,
    /// Serialization/deserialization error.
    Serialization,
    /// The operation is not supported for the given input.
    Unsupported,
    /// Unknown error occurred.
    Unknown,
}

/// A structured error type for shelfscan operations.
#[derive(Debug, ThisError)]
#[error("{kind:?}{}", message.as_ref().map(|m| format!(": {}", m)).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional error message.
    pub message: Option<String>,
    /// Optional source error.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a source error to this error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Creates a new invalid input error.
    pub fn invalid_input() -> Self {
        Self::new(ErrorKind::InvalidInput)
    }

    /// Creates a new configuration error.
    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    /// Creates a new network error.
    pub fn network_error() -> Self {
        Self::new(ErrorKind::NetworkError)
    }

    /// Creates a new engine failure error.
    pub fn engine_failure() -> Self {
        Self::new(ErrorKind::EngineFailure)
    }

    /// Creates a new I/O error.
    pub fn io() -> Self {
        Self::new(ErrorKind::Io)
    }

    /// Creates a new serialization error.
    pub fn serialization() -> Self {
        Self::new(ErrorKind::Serialization)
    }

    /// Creates a new unsupported error.
    pub fn unsupported() -> Self {
        Self::new(ErrorKind::Unsupported)
    }

    /// Creates a new unknown error.
    pub fn unknown() -> Self {
        Self::new(ErrorKind::Unknown)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error kind as a string.
    pub fn kind_str(&self) -> &'static str {
        self.kind.into()
    }

    /// Returns true if the operation might succeed if attempted again.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, ErrorKind::NetworkError)
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::io().with_source(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_strings_are_snake_case() {
        assert_eq!(Error::configuration().kind_str(), "configuration");
        assert_eq!(Error::engine_failure().kind_str(), "engine_failure");
        assert_eq!(Error::network_error().kind_str(), "network_error");
    }

    #[test]
    fn message_is_part_of_display() {
        let error = Error::configuration().with_message("missing API key");
        assert!(error.to_string().contains("missing API key"));
    }

    #[test]
    fn only_network_errors_are_retryable() {
        assert!(Error::network_error().is_retryable());
        assert!(!Error::configuration().is_retryable());
        assert!(!Error::engine_failure().is_retryable());
    }
}
