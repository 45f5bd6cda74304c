//! LLM prompt engineering for material request extraction

use crate::classifier::{classify, InputMode};
use chrono::NaiveDate;
use matorder_domain::FIELDS;

/// System-role message for gateways that support one
pub const SYSTEM_DIRECTIVE: &str = "Return ONLY valid JSON. No markdown. No commentary.";

/// Builds prompts for the LLM to extract material requests
///
/// The output is a pure function of the text, the mode and the reference
/// date: the same inputs always produce byte-identical prompts.
pub struct PromptBuilder {
    text: String,
    mode: InputMode,
    reference_date: Option<NaiveDate>,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(text: impl Into<String>, mode: InputMode) -> Self {
        Self {
            text: text.into(),
            mode,
            reference_date: None,
        }
    }

    /// Date that relative mentions ("tomorrow", "in 7 days") resolve against
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Role and output discipline
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 2. Field list, rendered from the schema table
        prompt.push_str("Schema (every field must be present):\n{\n");
        for (idx, field) in FIELDS.iter().enumerate() {
            let comma = if idx + 1 < FIELDS.len() { "," } else { "" };
            prompt.push_str(&format!(
                "  \"{}\": {}{}   // {}\n",
                field.name,
                field.kind.type_notation(),
                comma,
                field.description
            ));
        }
        prompt.push_str("}\n\n");

        // 3. Field rules
        prompt.push_str(FIELD_RULES);
        prompt.push_str("\n\n");

        // 4. Reference date for relative deadlines
        if let Some(date) = self.reference_date {
            prompt.push_str(&format!("Today is {}.\n\n", date.format("%Y-%m-%d")));
        }

        // 5. Expected shape and the text to analyze
        match self.mode {
            InputMode::Single => {
                prompt.push_str(SINGLE_SHAPE);
                prompt.push_str("\n\nText to analyze:\n---\n");
                prompt.push_str(self.text.trim());
                prompt.push_str("\n---\n\n");
            }
            InputMode::Batch => {
                let lines = classify(&self.text).lines;
                prompt.push_str(&format!(
                    "The text contains {} separate requests, one per line. \
                     Output a JSON array with exactly {} objects, in the same order as the lines. \
                     Each object describes only its own line.\n\n",
                    lines.len(),
                    lines.len()
                ));
                prompt.push_str("Requests:\n---\n");
                for (idx, line) in lines.iter().enumerate() {
                    prompt.push_str(&format!("{}. {}\n", idx + 1, line));
                }
                prompt.push_str("---\n\n");
            }
        }

        // 6. Output format reminder
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You are a construction material order parser.
Convert the request text into JSON that matches the schema below.
Output ONLY JSON. No markdown code blocks. No explanations, notes or prose."#;

const FIELD_RULES: &str = r#"Rules:
- All seven fields must exist; never add other fields
- Use null for anything not stated; never guess or hallucinate a value
- One material per object; if several quantities are given, use the first explicit one
- quantity is a plain number (350, not "350 bags"); put the unit in "unit"
- urgency:
  - "high" when the text says asap, urgent, urgently, immediately, today or similar
  - "medium" when a deadline or timeframe is given without urgency language
  - "low" only when the text says there is no rush
  - null when there is neither urgency language nor a deadline
- deadline:
  - convert explicit and relative dates ("by Friday", "in 7 days") to YYYY-MM-DD
  - null if the date cannot be resolved with confidence ("soon", "next week maybe")"#;

const SINGLE_SHAPE: &str = "Output exactly one JSON object.";

const OUTPUT_FORMAT_REMINDER: &str =
    "Remember: Return ONLY valid JSON, no markdown code blocks, no explanations.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_deterministic() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let a = PromptBuilder::new("50 bags cement", InputMode::Single)
            .with_reference_date(date)
            .build();
        let b = PromptBuilder::new("50 bags cement", InputMode::Single)
            .with_reference_date(date)
            .build();
        assert_eq!(a, b);
    }

    #[test]
    fn test_prompt_includes_every_field() {
        let prompt = PromptBuilder::new("x", InputMode::Single).build();
        for field in FIELDS.iter() {
            assert!(prompt.contains(&format!("\"{}\"", field.name)), "missing {}", field.name);
        }
        assert!(prompt.contains("\"low\" | \"medium\" | \"high\" | null"));
        assert!(prompt.contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_prompt_includes_directives() {
        let prompt = PromptBuilder::new("x", InputMode::Single).build();
        assert!(prompt.contains("Output ONLY JSON"));
        assert!(prompt.contains("never guess"));
        assert!(prompt.contains("asap"));
        assert!(prompt.contains("\"medium\" when a deadline"));
        assert!(prompt.contains("next week maybe"));
    }

    #[test]
    fn test_prompt_includes_text() {
        let prompt = PromptBuilder::new("Need 350 bags of Ultratech cement", InputMode::Single)
            .build();
        assert!(prompt.contains("Need 350 bags of Ultratech cement"));
        assert!(prompt.contains("Output exactly one JSON object."));
        assert!(!prompt.contains("JSON array"));
    }

    #[test]
    fn test_reference_date_is_optional() {
        let without = PromptBuilder::new("x", InputMode::Single).build();
        assert!(!without.contains("Today is"));

        let with = PromptBuilder::new("x", InputMode::Single)
            .with_reference_date(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap())
            .build();
        assert!(with.contains("Today is 2025-03-04."));
    }

    #[test]
    fn test_batch_prompt_demands_array_of_n() {
        let prompt = PromptBuilder::new("50 bags cement\n\n20 tonnes sand\n- 5 m3 gravel", InputMode::Batch)
            .build();
        assert!(prompt.contains("JSON array with exactly 3 objects"));
        assert!(prompt.contains("1. 50 bags cement\n"));
        assert!(prompt.contains("2. 20 tonnes sand\n"));
        assert!(prompt.contains("3. 5 m3 gravel\n"));
    }
}
