//! Fallback records for items the pipeline could not extract

use crate::config::DEFAULT_FALLBACK_KEYWORDS;
use matorder_domain::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a fallback record was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// The input had no content
    EmptyInput,
    /// The model gateway returned an error
    Gateway,
    /// No JSON value could be decoded from the response
    Extraction,
    /// JSON was decoded but held no usable object for this item
    Unusable,
    /// A combined batch response had no element for this line
    MissingBatchItem,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FallbackReason::EmptyInput => "empty input",
            FallbackReason::Gateway => "gateway error",
            FallbackReason::Extraction => "no JSON in response",
            FallbackReason::Unusable => "unusable JSON",
            FallbackReason::MissingBatchItem => "missing batch item",
        };
        f.write_str(s)
    }
}

/// Produces minimal schema-valid records from raw text
///
/// All fields are null except `material_name`, which is set when one of the
/// configured keywords appears in the text as a whole word. The earliest
/// occurrence wins; on a tie the longer keyword wins.
#[derive(Debug, Clone)]
pub struct FallbackHandler {
    keywords: Vec<String>,
}

impl FallbackHandler {
    /// Create a handler with the given material keywords
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Build the fallback record for `raw_text`
    pub fn record_for(&self, raw_text: &str) -> Record {
        match self.detect_material(raw_text) {
            Some(material) => Record::with_material(material),
            None => Record::empty(),
        }
    }

    /// Find the first material keyword mentioned in `raw_text`
    pub fn detect_material(&self, raw_text: &str) -> Option<String> {
        let haystack = raw_text.to_lowercase();

        self.keywords
            .iter()
            .filter_map(|keyword| first_word_match(&haystack, keyword).map(|pos| (pos, keyword)))
            .min_by(|(pos_a, kw_a), (pos_b, kw_b)| {
                pos_a.cmp(pos_b).then_with(|| kw_b.len().cmp(&kw_a.len()))
            })
            .map(|(_, keyword)| keyword.clone())
    }
}

impl Default for FallbackHandler {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_KEYWORDS)
    }
}

/// Byte offset of the first whole-word occurrence of `needle`
fn first_word_match(haystack: &str, needle: &str) -> Option<usize> {
    haystack.match_indices(needle).map(|(pos, _)| pos).find(|&pos| {
        let before = haystack[..pos].chars().next_back();
        let after = haystack[pos + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
