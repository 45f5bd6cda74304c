//! Record module - the canonical unit of output

use crate::{Quantity, Urgency};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Strings that mean "no value" and therefore never appear in a text field
pub const NULL_MARKERS: &[&str] = &["null", "none", "n/a", "na", "-"];

/// Whether `s`, ignoring case and surrounding whitespace, is a null marker
pub fn is_null_marker(s: &str) -> bool {
    let trimmed = s.trim();
    NULL_MARKERS
        .iter()
        .any(|marker| trimmed.eq_ignore_ascii_case(marker))
}

/// One material request extracted from text
///
/// Always serializes with exactly seven keys, in schema order, with `null`
/// for anything that could not be determined. Text fields are trimmed,
/// non-empty, and never a null marker (see [`NULL_MARKERS`]). Records are
/// built fresh per input item and are not mutated after being returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Record {
    /// Name of the requested material
    pub material_name: Option<String>,

    /// Requested amount
    pub quantity: Option<Quantity>,

    /// Unit of the amount (bags, tonnes, m3, ...)
    pub unit: Option<String>,

    /// Project the material is for
    pub project_name: Option<String>,

    /// Delivery site or location
    pub location: Option<String>,

    /// How soon it is needed
    pub urgency: Option<Urgency>,

    /// Calendar date it is needed by, rendered `YYYY-MM-DD`
    pub deadline: Option<NaiveDate>,
}

impl Record {
    /// Field names in wire order
    pub const FIELD_NAMES: [&'static str; 7] = [
        "material_name",
        "quantity",
        "unit",
        "project_name",
        "location",
        "urgency",
        "deadline",
    ];

    /// A record with every field null
    pub fn empty() -> Self {
        Self::default()
    }

    /// A record with only the material name set
    pub fn with_material(material_name: impl Into<String>) -> Self {
        Self {
            material_name: Some(material_name.into()),
            ..Self::default()
        }
    }

    /// Whether every field is null
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Number of non-null fields
    pub fn filled_fields(&self) -> usize {
        [
            self.material_name.is_some(),
            self.quantity.is_some(),
            self.unit.is_some(),
            self.project_name.is_some(),
            self.location.is_some(),
            self.urgency.is_some(),
            self.deadline.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }
}
