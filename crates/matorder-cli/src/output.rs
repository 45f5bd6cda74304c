//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use matorder_domain::Record;
use matorder_extractor::{ExtractionMetadata, ItemOutcome, ParseOutput};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format pipeline output.
    ///
    /// JSON formats print the wire form unchanged: an object for a single
    /// request, an array for a batch.
    pub fn format_output(&self, output: &ParseOutput) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string(output)?),
            OutputFormat::Pretty => Ok(serde_json::to_string_pretty(output)?),
            OutputFormat::Table => Ok(self.format_records_table(output.records())),
        }
    }

    /// Format records as a table.
    fn format_records_table(&self, records: &[Record]) -> String {
        let mut builder = Builder::default();
        let mut header = vec!["#".to_string()];
        header.extend(Record::FIELD_NAMES.iter().map(|name| name.to_string()));
        builder.push_record(header);

        for (idx, record) in records.iter().enumerate() {
            builder.push_record([
                (idx + 1).to_string(),
                cell(record.material_name.as_deref()),
                cell(record.quantity.map(|q| q.to_string()).as_deref()),
                cell(record.unit.as_deref()),
                cell(record.project_name.as_deref()),
                cell(record.location.as_deref()),
                cell(record.urgency.map(|u| u.as_str())),
                cell(record.deadline.map(|d| d.format("%Y-%m-%d").to_string()).as_deref()),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// One-line summary of a run, for stderr.
    pub fn report_summary(&self, metadata: &ExtractionMetadata, items: &[ItemOutcome]) -> String {
        let filled: usize = items.iter().map(|i| i.record.filled_fields()).sum();
        let mut summary = self.info(&format!(
            "run {} | model {} | {:?} | {} record(s), {} field(s) filled, {} fallback(s), {} call(s), {} ms",
            metadata.run_id,
            metadata.model_name,
            metadata.mode,
            metadata.items,
            filled,
            metadata.fallbacks,
            metadata.model_calls,
            metadata.processing_time_ms
        ));

        for (idx, item) in items.iter().enumerate().filter(|(_, i)| i.is_fallback()) {
            summary.push('\n');
            summary.push_str(&self.warning(&format!(
                "item {} fell back ({}): {}",
                idx + 1,
                fallback_reason(item),
                item.input
            )));
        }

        summary
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn cell(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn fallback_reason(item: &ItemOutcome) -> String {
    match item.source {
        matorder_extractor::RecordSource::Fallback { reason } => reason.to_string(),
        matorder_extractor::RecordSource::Extracted => "extracted".to_string(),
    }
}
