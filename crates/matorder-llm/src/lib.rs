//! Matorder LLM Provider Layer
//!
//! Model gateways implementing the `LlmProvider` trait from `matorder-domain`.
//!
//! # Architecture
//!
//! The extraction pipeline only ever sees `generate(prompt, temperature)`.
//! Everything about transport (HTTP, retries, timeouts, API keys) is local to
//! the provider.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Local Ollama API integration
//! - `GroqProvider`: Groq's OpenAI-compatible chat completions API
//!
//! # Examples
//!
//! ```
//! use matorder_llm::MockProvider;
//! use matorder_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new(r#"{"material_name": "cement"}"#);
//! let result = provider.generate("test prompt", 0.1).unwrap();
//! assert_eq!(result, r#"{"material_name": "cement"}"#);
//! ```

#![warn(missing_docs)]

pub mod groq;
pub mod ollama;

use matorder_domain::traits::LlmProvider as LlmProviderTrait;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use groq::GroqProvider;
pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// No API key configured for a hosted provider
    #[error("Missing API key: set {0} or configure provider.api_key")]
    MissingApiKey(String),

    /// Could not build the HTTP client or async runtime
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Build the runtime that network providers use to drive async HTTP
/// behind the blocking `LlmProvider` interface
pub(crate) fn build_runtime() -> Result<tokio::runtime::Runtime, LlmError> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .map_err(|e| LlmError::Runtime(format!("Failed to start async runtime: {}", e)))
}

/// How a scripted mock reply is selected
#[derive(Debug, Clone)]
enum Matcher {
    Exact(String),
    Contains(String),
}

impl Matcher {
    fn matches(&self, prompt: &str) -> bool {
        match self {
            Matcher::Exact(p) => prompt == p,
            Matcher::Contains(needle) => prompt.contains(needle.as_str()),
        }
    }
}

/// Scripted reply
#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Error(String),
}

#[derive(Debug, Default)]
struct MockState {
    call_count: usize,
    last_temperature: Option<f32>,
    prompts: Vec<String>,
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls. Rules
/// are checked in the order they were added; the first match wins, otherwise
/// the default response is returned.
///
/// # Examples
///
/// ```
/// use matorder_llm::MockProvider;
/// use matorder_domain::traits::LlmProvider;
///
/// let mut provider = MockProvider::new("{}");
/// provider.add_response_containing("cement", r#"{"material_name":"cement"}"#);
/// provider.add_error_containing("gibberish");
///
/// assert_eq!(provider.generate("... cement ...", 0.1).unwrap(), r#"{"material_name":"cement"}"#);
/// assert!(provider.generate("... gibberish ...", 0.1).is_err());
/// assert_eq!(provider.generate("other", 0.1).unwrap(), "{}");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    rules: Arc<Mutex<Vec<(Matcher, Reply)>>>,
    state: Arc<Mutex<MockState>>,
    model_name: String,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            rules: Arc::new(Mutex::new(Vec::new())),
            state: Arc::new(Mutex::new(MockState::default())),
            model_name: "mock".to_string(),
        }
    }

    /// Set the reported model name
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Add a specific response for an exact prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.push_rule(Matcher::Exact(prompt.into()), Reply::Text(response.into()));
    }

    /// Add a response for any prompt containing `needle`
    pub fn add_response_containing(
        &mut self,
        needle: impl Into<String>,
        response: impl Into<String>,
    ) {
        self.push_rule(Matcher::Contains(needle.into()), Reply::Text(response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        self.push_rule(
            Matcher::Exact(prompt.into()),
            Reply::Error("Mock error".to_string()),
        );
    }

    /// Configure to return an error for any prompt containing `needle`
    pub fn add_error_containing(&mut self, needle: impl Into<String>) {
        self.push_rule(
            Matcher::Contains(needle.into()),
            Reply::Error("Mock error".to_string()),
        );
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.state.lock().map(|s| s.call_count).unwrap_or(0)
    }

    /// Temperature passed on the most recent call
    pub fn last_temperature(&self) -> Option<f32> {
        self.state.lock().ok().and_then(|s| s.last_temperature)
    }

    /// Every prompt received, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|s| s.prompts.clone())
            .unwrap_or_default()
    }

    /// Reset the call count and recorded prompts
    pub fn reset_call_count(&self) {
        if let Ok(mut state) = self.state.lock() {
            *state = MockState::default();
        }
    }

    fn push_rule(&mut self, matcher: Matcher, reply: Reply) {
        if let Ok(mut rules) = self.rules.lock() {
            rules.push((matcher, reply));
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str, temperature: f32) -> Result<String, Self::Error> {
        {
            let mut state = self
                .state
                .lock()
                .map_err(|e| LlmError::Other(format!("Mock state poisoned: {}", e)))?;
            state.call_count += 1;
            state.last_temperature = Some(temperature);
            state.prompts.push(prompt.to_string());
        }

        let rules = self
            .rules
            .lock()
            .map_err(|e| LlmError::Other(format!("Mock rules poisoned: {}", e)))?;
        match rules.iter().find(|(matcher, _)| matcher.matches(prompt)) {
            Some((_, Reply::Text(response))) => Ok(response.clone()),
            Some((_, Reply::Error(message))) => Err(LlmError::Other(message.clone())),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("any prompt", 0.1);
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "Test response");
    }

    #[test]
    fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.generate("hello", 0.1).unwrap(), "world");
        assert_eq!(provider.generate("foo", 0.1).unwrap(), "bar");
        assert_eq!(provider.generate("unknown", 0.1).unwrap(), "Default mock response");
    }

    #[test]
    fn test_mock_provider_containing_rules_first_match_wins() {
        let mut provider = MockProvider::default();
        provider.add_response_containing("sand", "first");
        provider.add_response_containing("sand and gravel", "second");

        assert_eq!(provider.generate("need sand and gravel", 0.1).unwrap(), "first");
    }

    #[test]
    fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");

        assert_eq!(provider.call_count(), 0);

        provider.generate("prompt1", 0.1).unwrap();
        assert_eq!(provider.call_count(), 1);

        provider.generate("prompt2", 0.1).unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.prompts(), vec!["prompt1", "prompt2"]);

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
        assert!(provider.prompts().is_empty());
    }

    #[test]
    fn test_mock_provider_records_temperature() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.last_temperature(), None);

        provider.generate("prompt", 0.1).unwrap();
        assert_eq!(provider.last_temperature(), Some(0.1));
    }

    #[test]
    fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt");
        provider.add_error_containing("broken");

        let result = provider.generate("bad prompt", 0.1);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), LlmError::Other(_)));
        assert!(provider.generate("a broken line", 0.1).is_err());
    }

    #[test]
    fn test_mock_provider_clone() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate("test", 0.1).unwrap();

        // Both should share the same call count due to Arc
        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[test]
    fn test_mock_provider_model_name() {
        let provider = MockProvider::new("x").with_model_name("test-model");
        assert_eq!(LlmProviderTrait::model_name(&provider), "test-model");
    }
}
