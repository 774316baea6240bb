//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
///
/// Only [`ExtractorError::NoEventPages`] and [`ExtractorError::Config`] abort
/// a run. The rest are chunk-local: they are written to the trace and the
/// affected chunk contributes nothing.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Classification found no event-bearing pages
    #[error("No event pages found in document ({0} pages scanned)")]
    NoEventPages(usize),

    /// Completion service error
    #[error("Network error: {0}")]
    Network(String),

    /// Extraction timeout
    #[error("Extraction timeout after {0} seconds")]
    Timeout(u64),

    /// Response not parseable, even after repair
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Parsed payload lacks a well-formed events collection
    #[error("Schema error: {0}")]
    Schema(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExtractorError {
    /// Whether this error aborts the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExtractorError::NoEventPages(_) | ExtractorError::Config(_))
    }
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(ExtractorError::NoEventPages(3).is_fatal());
        assert!(ExtractorError::Config("x".into()).is_fatal());
        assert!(!ExtractorError::Network("503".into()).is_fatal());
        assert!(!ExtractorError::MalformedPayload("x".into()).is_fatal());
        assert!(!ExtractorError::Schema("x".into()).is_fatal());
    }

    #[test]
    fn test_json_error_conversion() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let converted: ExtractorError = err.into();
        assert!(matches!(converted, ExtractorError::JsonParse(_)));
    }
}
