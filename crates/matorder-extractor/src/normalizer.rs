//! Rebuild records field-by-field from untrusted JSON
//!
//! Nothing the model returns is passed through. A fresh [`Record`] is built
//! from the seven known keys only; each value is type-checked and anything
//! that does not conform becomes `null`. Normalization never fails.

use crate::classifier::InputMode;
use chrono::NaiveDate;
use matorder_domain::{is_null_marker, Quantity, Record, Urgency};
use serde_json::{Map, Value};
use tracing::debug;

/// Fit a parsed value to the shape the mode expects
///
/// - `Single`: an array yields only its first element (none if empty)
/// - `Batch`: an object is wrapped as a one-element sequence
pub fn shape_for_mode(value: Value, mode: InputMode) -> Vec<Value> {
    match (mode, value) {
        (InputMode::Single, Value::Array(items)) => items.into_iter().take(1).collect(),
        (InputMode::Batch, Value::Array(items)) => items,
        (_, other) => vec![other],
    }
}

/// Normalize a parsed value into records according to `mode`
///
/// Items that are not JSON objects come back as `None`; the caller decides
/// the fallback for those positions.
pub fn normalize(value: Value, mode: InputMode) -> Vec<Option<Record>> {
    shape_for_mode(value, mode)
        .iter()
        .map(normalize_record)
        .collect()
}

/// Build a record from one JSON object, or `None` if it is not an object
pub fn normalize_record(value: &Value) -> Option<Record> {
    let obj = match value.as_object() {
        Some(obj) => obj,
        None => {
            debug!("Item is not a JSON object: {}", value_kind(value));
            return None;
        }
    };

    for key in obj.keys() {
        if !Record::FIELD_NAMES.contains(&key.as_str()) {
            debug!("Dropping unknown field '{}'", key);
        }
    }

    Some(Record {
        material_name: material_field(obj),
        quantity: quantity_field(obj),
        unit: text_field(obj, "unit"),
        project_name: text_field(obj, "project_name"),
        location: text_field(obj, "location"),
        urgency: urgency_field(obj),
        deadline: deadline_field(obj),
    })
}

fn material_field(obj: &Map<String, Value>) -> Option<String> {
    match obj.get("material_name") {
        // A bare number ("42") is still a plausible material code
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => text_field(obj, "material_name"),
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => clean_text(s),
        Value::Null => None,
        other => {
            debug!("Field '{}': expected string, got {}", key, value_kind(other));
            None
        }
    }
}

fn quantity_field(obj: &Map<String, Value>) -> Option<Quantity> {
    let raw = obj.get("quantity")?;
    let quantity = match raw {
        Value::Number(n) => n.as_f64().and_then(Quantity::new),
        Value::String(s) => parse_numeric(s),
        Value::Null => return None,
        _ => None,
    };
    if quantity.is_none() {
        debug!("Field 'quantity' rejected: {}", raw);
    }
    quantity
}

fn urgency_field(obj: &Map<String, Value>) -> Option<Urgency> {
    let raw = obj.get("urgency")?;
    let urgency = match raw {
        Value::String(s) => Urgency::parse(s),
        Value::Null => return None,
        _ => None,
    };
    if urgency.is_none() {
        debug!("Field 'urgency' rejected: {}", raw);
    }
    urgency
}

fn deadline_field(obj: &Map<String, Value>) -> Option<NaiveDate> {
    let raw = obj.get("deadline")?;
    let deadline = match raw {
        Value::String(s) => parse_iso_date(s),
        Value::Null => return None,
        _ => None,
    };
    if deadline.is_none() {
        debug!("Field 'deadline' rejected: {}", raw);
    }
    deadline
}

/// Trim, and treat empty strings and null markers as absent
fn clean_text(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() || is_null_marker(trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a numeric string such as `"350"`, `" 12.5 "` or `"1,200"`
fn parse_numeric(s: &str) -> Option<Quantity> {
    let trimmed = s.trim();
    let digits = if has_thousands_separators(trimmed) {
        trimmed.replace(',', "")
    } else {
        trimmed.to_string()
    };
    digits.parse::<f64>().ok().and_then(Quantity::new)
}

/// `1,200` or `12,500,000.75`: comma groups of exactly three digits
fn has_thousands_separators(s: &str) -> bool {
    let integer_part = s.split('.').next().unwrap_or(s);
    let mut groups = integer_part.split(',');
    let head_ok = groups
        .next()
        .map(|g| (1..=3).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false);
    let mut saw_group = false;
    for group in groups {
        if group.len() != 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        saw_group = true;
    }
    head_ok && saw_group
}

/// Accept `YYYY-MM-DD`, optionally followed by an ISO time part
///
/// The date itself must be a real calendar day. A trailing time
/// (`T10:00:00Z`, ` 09:30`) is dropped.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.trim().as_bytes();
    if bytes.len() < 10 {
        return None;
    }

    let digits_at = |range: std::ops::Range<usize>| bytes[range].iter().all(u8::is_ascii_digit);
    if !(digits_at(0..4) && bytes[4] == b'-' && digits_at(5..7) && bytes[7] == b'-' && digits_at(8..10)) {
        return None;
    }

    match &bytes[10..] {
        [] => {}
        [sep, first, ..] if matches!(*sep, b'T' | b't' | b' ') && first.is_ascii_digit() => {}
        _ => return None,
    }

    let number = |range: std::ops::Range<usize>| {
        bytes[range]
            .iter()
            .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'))
    };
    NaiveDate::from_ymd_opt(number(0..4) as i32, number(5..7), number(8..10))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
