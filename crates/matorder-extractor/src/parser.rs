//! Recover one JSON value from a noisy model response
//!
//! The response is untrusted text. We strip code fences, find the first `{`
//! or `[`, and decode exactly one value from there with a streaming decoder.
//! Whatever follows that value (commentary, a second object, a closing fence)
//! is discarded rather than treated as an error. There is no second attempt.

use crate::error::ExtractorError;
use serde_json::Value;
use tracing::debug;

/// Extract the first complete JSON object or array from `response`
pub fn extract_json_value(response: &str) -> Result<Value, ExtractorError> {
    let cleaned = strip_code_fences(response);

    let start = cleaned
        .find(|c| c == '{' || c == '[')
        .ok_or_else(|| ExtractorError::Extraction("no '{' or '[' in response".to_string()))?;
    let candidate = &cleaned[start..];

    let mut stream = serde_json::Deserializer::from_str(candidate).into_iter::<Value>();
    match stream.next() {
        Some(Ok(value)) => {
            let consumed = stream.byte_offset();
            let discarded = candidate[consumed..].trim();
            if !discarded.is_empty() {
                debug!("Discarded {} trailing chars after JSON value", discarded.len());
            }
            Ok(value)
        }
        Some(Err(e)) => Err(ExtractorError::Extraction(e.to_string())),
        None => Err(ExtractorError::Extraction("empty JSON candidate".to_string())),
    }
}

/// Remove a leading ```` ```lang ```` fence and a trailing ```` ``` ```` fence
fn strip_code_fences(response: &str) -> &str {
    let mut text = response.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Skip an optional language tag such as `json`
        let tag_len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        text = rest[tag_len..].trim_start();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }

    text
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: arbitrary text never panics the extractor
        #[test]
        fn test_arbitrary_text_never_panics(text in ".*") {
            let _ = extract_json_value(&text);
        }

        /// Property: any suffix after a complete object is ignored
        #[test]
        fn test_suffix_is_ignored(name in "[a-z ]{1,20}", suffix in ".*") {
            let object = serde_json::json!({"material_name": name});
            let response = format!("{}{}", object, suffix);
            prop_assert_eq!(extract_json_value(&response).unwrap(), object);
        }
    }
}
