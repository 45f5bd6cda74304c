//! Groq Provider Implementation
//!
//! Talks to Groq's OpenAI-compatible chat completions endpoint. The prompt is
//! sent as the user message, preceded by a fixed system message that repeats
//! the JSON-only directive.

use crate::LlmError;
use matorder_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

/// Default Groq API base URL
pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Default cap on generated tokens; one record fits comfortably
pub const DEFAULT_MAX_TOKENS: u32 = 300;

/// Default timeout for requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default system message
pub const DEFAULT_SYSTEM_MESSAGE: &str =
    "Return ONLY valid JSON. No markdown. No commentary.";

/// Groq chat completions provider
pub struct GroqProvider {
    endpoint: String,
    model: String,
    api_key: String,
    system_message: String,
    max_tokens: u32,
    max_retries: u32,
    client: reqwest::Client,
    runtime: Runtime,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl GroqProvider {
    /// Create a provider with an explicit API key
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey(API_KEY_ENV.to_string()));
        }

        let client = http_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key,
            system_message: DEFAULT_SYSTEM_MESSAGE.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            max_retries: DEFAULT_MAX_RETRIES,
            client,
            runtime: crate::build_runtime()?,
        })
    }

    /// Create a provider reading the key from `GROQ_API_KEY`
    pub fn from_env(model: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| LlmError::MissingApiKey(API_KEY_ENV.to_string()))?;
        Self::new(api_key, model)
    }

    /// Point at a different OpenAI-compatible base URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the system message
    pub fn with_system_message(mut self, message: impl Into<String>) -> Self {
        self.system_message = message.into();
        self
    }

    /// Cap the number of generated tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Replace the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = http_client(timeout)?;
        Ok(self)
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    fn request_body<'a>(&'a self, prompt: &'a str, temperature: f32) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.system_message,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Send one chat completion request, retrying transient failures
    pub async fn generate_async(&self, prompt: &str, temperature: f32) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.endpoint);
        let body = self.request_body(prompt, temperature);

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed = response.json::<ChatResponse>().await.map_err(|e| {
                            LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                        })?;
                        return parsed
                            .choices
                            .into_iter()
                            .next()
                            .and_then(|c| c.message.content)
                            .ok_or_else(|| {
                                LlmError::InvalidResponse("Response had no content".to_string())
                            });
                    } else if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    } else if status == reqwest::StatusCode::UNAUTHORIZED {
                        return Err(LlmError::Communication(
                            "HTTP 401: API key rejected".to_string(),
                        ));
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(LlmError::RateLimitExceeded);
                    } else {
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!("Groq request failed (attempt {}), retrying in {:?}", attempts, delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

fn http_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Runtime(format!("Failed to build HTTP client: {}", e)))
}

impl LlmProviderTrait for GroqProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str, temperature: f32) -> Result<String, Self::Error> {
        debug!("Groq generate: model={}, prompt {} chars", self.model, prompt.len());
        self.runtime
            .block_on(self.generate_async(prompt, temperature))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_blank_api_key() {
        let result = GroqProvider::new("   ", DEFAULT_MODEL);
        assert!(matches!(result, Err(LlmError::MissingApiKey(_))));
    }

    #[test]
    fn test_builder_settings() {
        let provider = GroqProvider::new("gsk_test", DEFAULT_MODEL)
            .unwrap()
            .with_endpoint("http://localhost:8000/v1/")
            .with_max_tokens(128)
            .with_max_retries(0)
            .with_timeout(Duration::from_secs(5))
            .unwrap();

        assert_eq!(provider.endpoint, "http://localhost:8000/v1");
        assert_eq!(provider.max_tokens, 128);
        assert_eq!(provider.max_retries, 1);
        assert_eq!(LlmProviderTrait::model_name(&provider), DEFAULT_MODEL);
    }

    #[test]
    fn test_request_body_shape() {
        let provider = GroqProvider::new("gsk_test", "llama-3.1-8b-instant").unwrap();
        let body = serde_json::to_value(provider.request_body("parse this", 0.1)).unwrap();

        assert_eq!(body["model"], "llama-3.1-8b-instant");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], DEFAULT_SYSTEM_MESSAGE);
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "parse this");
        assert_eq!(body["max_tokens"], DEFAULT_MAX_TOKENS);
        assert!((body["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"{}"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("{}"));
    }

    #[test]
    fn test_connection_failure_is_communication_error() {
        let provider = GroqProvider::new("gsk_test", DEFAULT_MODEL)
            .unwrap()
            .with_endpoint("http://127.0.0.1:9")
            .with_max_retries(1);

        let result = provider.generate("test", 0.1);
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }

    #[test]
    #[ignore] // Requires GROQ_API_KEY and network access
    fn test_groq_generate_integration() {
        let provider = GroqProvider::from_env(DEFAULT_MODEL).unwrap();
        let response = provider.generate("Return {} and nothing else", 0.1).unwrap();
        assert!(response.contains('{'));
    }
}
