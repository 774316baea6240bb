//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pipeline error
    #[error("Extraction failed: {0}")]
    Extractor(#[from] meetsheet_extractor::ExtractorError),

    /// Completion provider setup error
    #[error("Provider error: {0}")]
    Provider(#[from] meetsheet_llm::LlmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No credential for a strategy that needs one
    #[error("No API key. Pass --api-key or set DEEPSEEK_API_KEY, or use --strategy pattern.")]
    MissingApiKey,
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetsheet_extractor::ExtractorError;

    #[test]
    fn test_extractor_error_conversion() {
        let err: CliError = ExtractorError::NoEventPages(4).into();
        assert!(err.to_string().contains("No event pages"));
    }

    #[test]
    fn test_missing_key_message() {
        assert!(CliError::MissingApiKey.to_string().contains("DEEPSEEK_API_KEY"));
    }
}
