//! Matorder Extractor
//!
//! Converts free-form material requests into schema-valid JSON records using
//! an LLM as an untrusted extractor.
//!
//! # Overview
//!
//! The model is asked for JSON but its answer is treated as raw text. A single
//! decode pass recovers the first JSON value, a normalizer rebuilds each record
//! from the seven known fields, and a fallback handler covers every failure.
//! The public entry point never returns an error.
//!
//! # Architecture
//!
//! ```text
//! Text → Classifier → PromptBuilder → LLM → extract_json_value → normalize
//!                                              │                    │
//!                                              └──── failure ───→ Fallback
//! ```
//!
//! Multi-line input is a batch: each line runs through the pipeline on its
//! own, so one bad line cannot break the rest, and output order matches input
//! order.
//!
//! # Example Usage
//!
//! ```
//! use matorder_extractor::{ExtractorConfig, MaterialParser, ParseOutput};
//! use matorder_llm::MockProvider;
//!
//! let llm = MockProvider::new(
//!     r#"{"material_name": "cement", "quantity": 350, "unit": "bags"} Hope this helps!"#,
//! );
//! let parser = MaterialParser::new(llm, ExtractorConfig::default())?;
//!
//! match parser.parse("Need 350 bags of cement") {
//!     ParseOutput::Single(record) => {
//!         assert_eq!(record.material_name.as_deref(), Some("cement"));
//!         assert_eq!(record.unit.as_deref(), Some("bags"));
//!     }
//!     ParseOutput::Batch(_) => unreachable!(),
//! }
//! # Ok::<(), matorder_extractor::ExtractorError>(())
//! ```

#![warn(missing_docs)]

mod batch;
mod classifier;
mod config;
mod error;
mod extractor;
mod fallback;
mod normalizer;
mod parser;
mod prompt;
mod types;


pub use classifier::{classify, Classification, InputMode};
pub use config::{BatchStrategy, ExtractorConfig, DEFAULT_FALLBACK_KEYWORDS, DEFAULT_TEMPERATURE};
pub use error::ExtractorError;
pub use extractor::MaterialParser;
pub use fallback::{FallbackHandler, FallbackReason};
pub use normalizer::{normalize, normalize_record, parse_iso_date, shape_for_mode};
pub use parser::extract_json_value;
pub use prompt::{PromptBuilder, SYSTEM_DIRECTIVE};
pub use types::{ExtractionMetadata, ExtractionReport, ItemOutcome, ParseOutput, RecordSource};
