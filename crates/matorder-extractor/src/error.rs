//! Error types for the Extractor
//!
//! None of these reach the caller of `MaterialParser::parse`; they mark the
//! point where the pipeline switched to a fallback record.

use thiserror::Error;

/// Errors that can occur inside the extraction pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractorError {
    /// No parseable JSON value in the model response
    #[error("No JSON value found in model response: {0}")]
    Extraction(String),

    /// Input had no content to extract from
    #[error("Empty input")]
    EmptyInput,

    /// Model gateway error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
