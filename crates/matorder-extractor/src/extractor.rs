//! Core pipeline: text in, schema-valid records out

use crate::batch::{align_combined, fallback_outcome, run_parallel, run_per_line};
use crate::classifier::{classify, InputMode};
use crate::config::{BatchStrategy, ExtractorConfig};
use crate::error::ExtractorError;
use crate::fallback::{FallbackHandler, FallbackReason};
use crate::normalizer::normalize;
use crate::parser::extract_json_value;
use crate::prompt::PromptBuilder;
use crate::types::{ExtractionMetadata, ExtractionReport, ItemOutcome, ParseOutput, RecordSource};
use chrono::NaiveDate;
use matorder_domain::traits::LlmProvider;
use matorder_domain::Record;
use std::fmt::Display;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Converts free-form material requests into schema-valid records
///
/// The model's output is never trusted: every response goes through the
/// safe JSON extractor and the normalizer, and any failure is absorbed by
/// the fallback handler. [`MaterialParser::parse`] therefore always returns
/// a valid [`ParseOutput`].
pub struct MaterialParser<L>
where
    L: LlmProvider,
{
    llm_provider: L,
    config: ExtractorConfig,
    fallback: FallbackHandler,
    model_name: Option<String>,
    reference_date: Option<NaiveDate>,
}

impl<L> MaterialParser<L>
where
    L: LlmProvider + Sync,
    L::Error: Display,
{
    /// Create a new parser
    ///
    /// Fails only if the configuration is invalid.
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        let fallback = FallbackHandler::new(&config.fallback_keywords);

        Ok(Self {
            llm_provider,
            config,
            fallback,
            model_name: None,
            reference_date: None,
        })
    }

    /// Report a specific model name instead of the provider's
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    /// Fix the date relative deadlines resolve against (defaults to today)
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Parse raw text into one record or an ordered batch
    pub fn parse(&self, text: &str) -> ParseOutput {
        self.parse_with_report(text).output
    }

    /// Parse raw text and report per-item outcomes and run metadata
    pub fn parse_with_report(&self, text: &str) -> ExtractionReport {
        let started = Instant::now();
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let run_id = Uuid::now_v7();

        let classification = classify(text);
        info!(
            "Starting extraction {}: mode {:?}, {} line(s), text length {}",
            run_id,
            classification.mode,
            classification.lines.len(),
            text.len()
        );

        let (items, model_calls) = match classification.mode {
            InputMode::Single => match classification.lines.first() {
                None => {
                    debug!("{}", ExtractorError::EmptyInput);
                    let item = fallback_outcome("", FallbackReason::EmptyInput, &self.fallback);
                    (vec![item], 0)
                }
                Some(line) => (vec![self.extract_item(line)], 1),
            },
            InputMode::Batch => self.extract_batch(&classification.lines),
        };

        let output = match classification.mode {
            InputMode::Single => ParseOutput::Single(
                items.first().map(|i| i.record.clone()).unwrap_or_default(),
            ),
            InputMode::Batch => ParseOutput::Batch(items.iter().map(|i| i.record.clone()).collect()),
        };

        let fallbacks = items.iter().filter(|i| i.is_fallback()).count();
        let metadata = ExtractionMetadata {
            run_id,
            timestamp,
            model_name: self.model_name().to_string(),
            mode: output.mode(),
            items: items.len(),
            fallbacks,
            model_calls,
            processing_time_ms: started.elapsed().as_millis() as u64,
        };

        info!(
            "Extraction {} complete: {} record(s), {} fallback(s), {} model call(s)",
            run_id, metadata.items, metadata.fallbacks, metadata.model_calls
        );

        ExtractionReport {
            output,
            items,
            metadata,
        }
    }

    /// The exact prompts `parse` would send for `text`, in call order
    pub fn prompts_for(&self, text: &str) -> Vec<String> {
        let classification = classify(text);
        match (classification.mode, self.config.batch_strategy) {
            (InputMode::Batch, BatchStrategy::Combined) => {
                vec![self.build_prompt(&classification.lines.join("\n"), InputMode::Batch)]
            }
            _ => classification
                .lines
                .iter()
                .map(|line| self.build_prompt(line, InputMode::Single))
                .collect(),
        }
    }

    fn extract_batch(&self, lines: &[&str]) -> (Vec<ItemOutcome>, usize) {
        match self.config.batch_strategy {
            BatchStrategy::PerLine => (run_per_line(lines, |line| self.extract_item(line)), lines.len()),
            BatchStrategy::Parallel => (
                run_parallel(lines, self.config.max_parallelism, |line| self.extract_item(line)),
                lines.len(),
            ),
            BatchStrategy::Combined => {
                let prompt = self.build_prompt(&lines.join("\n"), InputMode::Batch);
                let response = self.run_model(&prompt, InputMode::Batch);
                (align_combined(lines, response, &self.fallback), 1)
            }
        }
    }

    /// Full single-item pipeline for one request line
    fn extract_item(&self, input: &str) -> ItemOutcome {
        let prompt = self.build_prompt(input, InputMode::Single);

        match self.run_model(&prompt, InputMode::Single) {
            Ok(records) => match records.into_iter().next().flatten() {
                Some(record) if !record.is_empty() => ItemOutcome {
                    input: input.to_string(),
                    record,
                    source: RecordSource::Extracted,
                },
                _ => fallback_outcome(input, FallbackReason::Unusable, &self.fallback),
            },
            Err(reason) => fallback_outcome(input, reason, &self.fallback),
        }
    }

    /// Gateway → extractor → normalizer, mapping failures to a fallback reason
    fn run_model(&self, prompt: &str, mode: InputMode) -> Result<Vec<Option<Record>>, FallbackReason> {
        debug!("Prompt length: {} chars", prompt.len());

        let response = self
            .llm_provider
            .generate(prompt, self.config.temperature)
            .map_err(|e| {
                warn!("{}", ExtractorError::Llm(e.to_string()));
                FallbackReason::Gateway
            })?;

        debug!("LLM response length: {} chars", response.len());

        let value = extract_json_value(&response).map_err(|e| {
            warn!("{}", e);
            FallbackReason::Extraction
        })?;

        Ok(normalize(value, mode))
    }

    fn build_prompt(&self, text: &str, mode: InputMode) -> String {
        let date = self
            .reference_date
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        PromptBuilder::new(text, mode).with_reference_date(date).build()
    }

    fn model_name(&self) -> &str {
        self.model_name
            .as_deref()
            .unwrap_or_else(|| self.llm_provider.model_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matorder_llm::MockProvider;

    fn create_test_parser(response: &str) -> MaterialParser<MockProvider> {
        MaterialParser::new(MockProvider::new(response), ExtractorConfig::default())
            .unwrap()
            .with_reference_date(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap())
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = ExtractorConfig::default();
        config.max_parallelism = 0;
        let result = MaterialParser::new(MockProvider::new("{}"), config);
        assert!(matches!(result, Err(ExtractorError::Config(_))));
    }

    #[test]
    fn test_empty_input_makes_no_model_call() {
        let llm = MockProvider::new("{}");
        let parser = MaterialParser::new(llm.clone(), ExtractorConfig::default()).unwrap();

        let report = parser.parse_with_report("   \n  ");
        assert_eq!(report.output, ParseOutput::Single(Record::empty()));
        assert_eq!(
            report.items[0].source,
            RecordSource::fallback(FallbackReason::EmptyInput)
        );
        assert_eq!(report.metadata.model_calls, 0);
        assert_eq!(llm.call_count(), 0);
    }

    #[test]
    fn test_uses_configured_temperature() {
        let llm = MockProvider::new(r#"{"material_name":"sand"}"#);
        let mut config = ExtractorConfig::default();
        config.temperature = 0.05;
        let parser = MaterialParser::new(llm.clone(), config).unwrap();

        parser.parse("20 tonnes sand");
        assert_eq!(llm.last_temperature(), Some(0.05));
    }

    #[test]
    fn test_all_null_object_falls_back() {
        let parser = create_test_parser(r#"{"material_name": null, "quantity": null}"#);
        let report = parser.parse_with_report("need bricks soon");

        assert_eq!(report.output, ParseOutput::Single(Record::with_material("bricks")));
        assert_eq!(
            report.items[0].source,
            RecordSource::fallback(FallbackReason::Unusable)
        );
    }

    #[test]
    fn test_model_name_override() {
        let parser = create_test_parser("{}").with_model_name("test-model");
        let report = parser.parse_with_report("sand");
        assert_eq!(report.metadata.model_name, "test-model");

        let parser = create_test_parser("{}");
        let report = parser.parse_with_report("sand");
        assert_eq!(report.metadata.model_name, "mock");
    }

    #[test]
    fn test_prompts_for_follows_strategy() {
        let parser = create_test_parser("{}");
        let prompts = parser.prompts_for("50 bags cement\n20 tonnes sand");
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("50 bags cement"));
        assert!(prompts[1].contains("20 tonnes sand"));
        assert!(prompts[0].contains("Today is 2025-01-10."));

        let mut config = ExtractorConfig::default();
        config.batch_strategy = BatchStrategy::Combined;
        let parser = MaterialParser::new(MockProvider::new("[]"), config).unwrap();
        let prompts = parser.prompts_for("50 bags cement\n20 tonnes sand");
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("exactly 2 objects"));
    }
}
