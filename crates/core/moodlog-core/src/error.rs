//! Error types for Moodlog core

use thiserror::Error;

/// Main error type for Moodlog operations
#[derive(Debug, Error)]
pub enum MoodlogError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Network/HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error (bad input from the user)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Classification model error
    #[error("Model error: {0}")]
    Model(String),

    /// Audio decode / preprocessing error
    #[error("Audio error: {0}")]
    Audio(String),

    /// Document (PDF / OCR) extraction error
    #[error("Document error: {0}")]
    Document(String),

    /// Face analyzer found nothing to classify
    #[error("No face detected")]
    NoFaceDetected,

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Convenient Result type using MoodlogError
pub type Result<T> = std::result::Result<T, MoodlogError>;

impl MoodlogError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        MoodlogError::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        MoodlogError::Validation(msg.into())
    }

    /// Create a model error
    pub fn model(msg: impl Into<String>) -> Self {
        MoodlogError::Model(msg.into())
    }

    /// Create an audio error
    pub fn audio(msg: impl Into<String>) -> Self {
        MoodlogError::Audio(msg.into())
    }

    /// Create a document error
    pub fn document(msg: impl Into<String>) -> Self {
        MoodlogError::Document(msg.into())
    }

    /// Create a template error
    pub fn template(msg: impl Into<String>) -> Self {
        MoodlogError::Template(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        MoodlogError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = MoodlogError::audio("bad header");
        assert_eq!(err.to_string(), "Audio error: bad header");

        let err = MoodlogError::model("503 from upstream");
        assert_eq!(err.to_string(), "Model error: 503 from upstream");

        assert_eq!(MoodlogError::NoFaceDetected.to_string(), "No face detected");
    }

    #[test]
    fn test_json_error_converts() {
        fn parse() -> Result<serde_json::Value> {
            Ok(serde_json::from_str("{not json")?)
        }

        assert!(matches!(parse(), Err(MoodlogError::Serialization(_))));
    }
}
