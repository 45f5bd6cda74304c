//! Trait definitions for external interactions
//!
//! These traits define the boundary between the extraction pipeline and the
//! language model. Implementations live in `matorder-llm`.

/// Trait for language-model gateways
///
/// The pipeline treats the response as untrusted text that may or may not
/// contain JSON. Timeouts and retries are the implementation's concern.
pub trait LlmProvider {
    /// Error type for gateway operations
    type Error;

    /// Generate a completion for `prompt` at the given sampling temperature
    fn generate(&self, prompt: &str, temperature: f32) -> Result<String, Self::Error>;

    /// Model identifier, for reporting
    fn model_name(&self) -> &str {
        "llm"
    }
}
