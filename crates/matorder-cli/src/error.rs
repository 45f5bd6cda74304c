//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
///
/// Extraction itself never fails; these cover the CLI's own I/O,
/// configuration and provider setup.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

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

    /// Provider could not be constructed
    #[error("Provider error: {0}")]
    Llm(#[from] matorder_llm::LlmError),
}

impl From<matorder_extractor::ExtractorError> for CliError {
    fn from(err: matorder_extractor::ExtractorError) -> Self {
        CliError::Config(err.to_string())
    }
}
