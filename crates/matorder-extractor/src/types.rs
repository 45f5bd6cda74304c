//! Request and response types for extraction

use crate::classifier::InputMode;
use crate::fallback::FallbackReason;
use matorder_domain::Record;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Output of the pipeline: one record or an ordered batch
///
/// Serializes untagged, so the wire form is either a JSON object with the
/// seven schema keys or a JSON array of such objects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParseOutput {
    /// Input held a single request
    Single(Record),
    /// Input held several request lines, in input order
    Batch(Vec<Record>),
}

impl ParseOutput {
    /// All records, in order
    pub fn records(&self) -> &[Record] {
        match self {
            ParseOutput::Single(record) => std::slice::from_ref(record),
            ParseOutput::Batch(records) => records,
        }
    }

    /// Mode the output corresponds to
    pub fn mode(&self) -> InputMode {
        match self {
            ParseOutput::Single(_) => InputMode::Single,
            ParseOutput::Batch(_) => InputMode::Batch,
        }
    }

    /// Serialize to the wire format
    pub fn to_json(&self) -> serde_json::Value {
        // Records are plain data with string keys; this cannot fail
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Where a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RecordSource {
    /// Built from the model's JSON
    Extracted,
    /// Built by the fallback handler
    Fallback {
        /// Failure that triggered the fallback
        reason: FallbackReason,
    },
}

impl RecordSource {
    /// Fallback with the given reason
    pub fn fallback(reason: FallbackReason) -> Self {
        RecordSource::Fallback { reason }
    }
}

/// Outcome for one input item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemOutcome {
    /// Request line (or whole input in single mode)
    pub input: String,

    /// Normalized record
    pub record: Record,

    /// Whether the record was extracted or substituted
    #[serde(flatten)]
    pub source: RecordSource,
}

impl ItemOutcome {
    /// Whether this item fell back
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, RecordSource::Fallback { .. })
    }
}

/// Metadata about an extraction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    /// Unique id of this run (UUIDv7, time-ordered)
    pub run_id: Uuid,

    /// Unix timestamp (seconds) when the run started
    pub timestamp: u64,

    /// Name of the LLM model used
    pub model_name: String,

    /// Single or batch
    pub mode: InputMode,

    /// Number of records produced
    pub items: usize,

    /// Number of those that are fallbacks
    pub fallbacks: usize,

    /// Number of model calls made
    pub model_calls: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Full result of a run: output plus per-item detail
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionReport {
    /// Wire-format output
    pub output: ParseOutput,

    /// Per-item outcomes, aligned with the output records
    pub items: Vec<ItemOutcome>,

    /// Run metadata
    pub metadata: ExtractionMetadata,
}
