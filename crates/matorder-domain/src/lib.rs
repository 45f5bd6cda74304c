//! Matorder Domain Layer
//!
//! Core model for turning free-form material requests into structured records.
//! Everything downstream of the language model produces values of these types,
//! so the invariants of the output schema are enforced here by construction.
//!
//! ## Key Concepts
//!
//! - **Record**: One material request with exactly seven nullable fields
//! - **Urgency**: Closed enum (`low`, `medium`, `high`)
//! - **Quantity**: Finite numeric amount, serialized as an integer when whole
//! - **Schema**: Ordered field table shared by the prompt builder and normalizer
//!
//! ## Architecture
//!
//! - Pure data and trait definitions only
//! - Infrastructure (model gateways) lives in `matorder-llm`
//! - The pipeline lives in `matorder-extractor`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod quantity;
pub mod record;
pub mod schema;
pub mod traits;
pub mod urgency;

// Re-exports for convenience
pub use quantity::Quantity;
pub use record::{is_null_marker, Record, NULL_MARKERS};
pub use schema::{FieldKind, FieldSpec, FIELDS};
pub use urgency::Urgency;
