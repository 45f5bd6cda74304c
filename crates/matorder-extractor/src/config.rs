//! Configuration for the Extractor

use serde::{Deserialize, Serialize};

/// Sampling temperature used for every extraction call
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Material keywords recognised by the fallback handler
pub const DEFAULT_FALLBACK_KEYWORDS: &[&str] = &[
    "cement",
    "concrete",
    "ready mix",
    "sand",
    "gravel",
    "aggregate",
    "bricks",
    "brick",
    "blocks",
    "steel",
    "rebar",
    "tmt bars",
    "timber",
    "plywood",
    "tiles",
    "paint",
    "pipes",
    "cables",
    "glass",
    "gypsum",
    "asphalt",
    "bitumen",
    "lime",
    "mortar",
];

/// How multi-line input is sent to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStrategy {
    /// One model call per line, sequentially
    PerLine,
    /// One model call per line, on a thread pool
    Parallel,
    /// One model call for all lines, expecting a JSON array
    Combined,
}

impl Default for BatchStrategy {
    fn default() -> Self {
        BatchStrategy::PerLine
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Sampling temperature passed to the model (kept low for determinism)
    pub temperature: f32,

    /// How batch input is dispatched
    pub batch_strategy: BatchStrategy,

    /// Worker threads for `BatchStrategy::Parallel`
    pub max_parallelism: usize,

    /// Keywords the fallback handler looks for in raw text
    pub fallback_keywords: Vec<String>,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.temperature.is_finite() || !(0.0..=1.0).contains(&self.temperature) {
            return Err(format!(
                "temperature must be within [0.0, 1.0], got {}",
                self.temperature
            ));
        }
        if self.max_parallelism == 0 {
            return Err("max_parallelism must be greater than 0".to_string());
        }
        if self.fallback_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err("fallback_keywords must not contain blank entries".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            batch_strategy: BatchStrategy::PerLine,
            max_parallelism: 4,
            fallback_keywords: DEFAULT_FALLBACK_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}
