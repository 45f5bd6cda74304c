//! Gateway selection from configuration.

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::Result;
use matorder_domain::traits::LlmProvider;
use matorder_extractor::SYSTEM_DIRECTIVE;
use matorder_llm::{groq, ollama, GroqProvider, LlmError, MockProvider, OllamaProvider};
use std::time::Duration;
use tracing::info;

/// Reply of the offline mock: not JSON, so every request takes the fallback path
const MOCK_REPLY: &str = "mock provider: no model attached";

/// Any configured gateway behind one concrete type.
pub enum Provider {
    /// Local Ollama server
    Ollama(OllamaProvider),
    /// Groq hosted API
    Groq(GroqProvider),
    /// Offline mock
    Mock(MockProvider),
}

impl Provider {
    /// Build the gateway described by `config`.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);

        let provider = match config.kind {
            ProviderKind::Ollama => {
                let endpoint = config.endpoint.as_deref().unwrap_or(ollama::DEFAULT_ENDPOINT);
                let model = config.model.as_deref().unwrap_or(ollama::DEFAULT_MODEL);
                let mut provider = OllamaProvider::with_timeout(endpoint, model, timeout)?
                    .with_max_retries(config.max_retries);
                if let Some(max_tokens) = config.max_tokens {
                    provider = provider.with_max_tokens(max_tokens);
                }
                Provider::Ollama(provider)
            }
            ProviderKind::Groq => {
                let model = config.model.as_deref().unwrap_or(groq::DEFAULT_MODEL);
                let mut provider = match config.api_key.as_deref() {
                    Some(key) => GroqProvider::new(key, model)?,
                    None => GroqProvider::from_env(model)?,
                }
                .with_system_message(SYSTEM_DIRECTIVE)
                .with_max_retries(config.max_retries)
                .with_timeout(timeout)?;
                if let Some(endpoint) = config.endpoint.as_deref() {
                    provider = provider.with_endpoint(endpoint);
                }
                if let Some(max_tokens) = config.max_tokens {
                    provider = provider.with_max_tokens(max_tokens);
                }
                Provider::Groq(provider)
            }
            ProviderKind::Mock => {
                let mock = MockProvider::new(MOCK_REPLY);
                Provider::Mock(match config.model.as_deref() {
                    Some(model) => mock.with_model_name(model),
                    None => mock,
                })
            }
        };

        info!("Using {:?} provider, model {}", config.kind, provider.model_name());
        Ok(provider)
    }
}

impl LlmProvider for Provider {
    type Error = LlmError;

    fn generate(&self, prompt: &str, temperature: f32) -> std::result::Result<String, LlmError> {
        match self {
            Provider::Ollama(p) => p.generate(prompt, temperature),
            Provider::Groq(p) => p.generate(prompt, temperature),
            Provider::Mock(p) => p.generate(prompt, temperature),
        }
    }

    fn model_name(&self) -> &str {
        match self {
            Provider::Ollama(p) => p.model_name(),
            Provider::Groq(p) => p.model_name(),
            Provider::Mock(p) => p.model_name(),
        }
    }
}
