//! Schema module - the seven-field output schema as data
//!
//! The prompt builder renders its field list from [`FIELDS`] and the
//! normalizer reads exactly these keys, so the two cannot drift apart.

use crate::Record;

/// Declared type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, nullable
    Text,
    /// Finite number, nullable
    Number,
    /// One of a closed set of lowercase strings, nullable
    Enum(&'static [&'static str]),
    /// Calendar date as `YYYY-MM-DD`, nullable
    IsoDate,
}

impl FieldKind {
    /// Type notation used in prompts
    pub fn type_notation(&self) -> String {
        match self {
            FieldKind::Text => "string | null".to_string(),
            FieldKind::Number => "number | null".to_string(),
            FieldKind::Enum(values) => {
                let mut parts: Vec<String> =
                    values.iter().map(|v| format!("\"{}\"", v)).collect();
                parts.push("null".to_string());
                parts.join(" | ")
            }
            FieldKind::IsoDate => "string (YYYY-MM-DD) | null".to_string(),
        }
    }
}

/// One field of the output schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// JSON key
    pub name: &'static str,
    /// Declared type
    pub kind: FieldKind,
    /// Short meaning, shown to the model
    pub description: &'static str,
}

/// Allowed urgency values in ascending order
pub const URGENCY_VALUES: &[&str] = &["low", "medium", "high"];

/// The output schema, in wire order
pub const FIELDS: [FieldSpec; 7] = [
    FieldSpec {
        name: "material_name",
        kind: FieldKind::Text,
        description: "the material being requested, including brand or grade if stated",
    },
    FieldSpec {
        name: "quantity",
        kind: FieldKind::Number,
        description: "the requested amount as a plain number",
    },
    FieldSpec {
        name: "unit",
        kind: FieldKind::Text,
        description: "unit of the quantity (bags, tonnes, m3, pieces, ...)",
    },
    FieldSpec {
        name: "project_name",
        kind: FieldKind::Text,
        description: "project or job the material is for",
    },
    FieldSpec {
        name: "location",
        kind: FieldKind::Text,
        description: "delivery site, city or address",
    },
    FieldSpec {
        name: "urgency",
        kind: FieldKind::Enum(URGENCY_VALUES),
        description: "how soon the material is needed",
    },
    FieldSpec {
        name: "deadline",
        kind: FieldKind::IsoDate,
        description: "date the material is needed by",
    },
];

// Keep the record's field list and the schema table in lockstep
const _: () = assert!(FIELDS.len() == Record::FIELD_NAMES.len());
