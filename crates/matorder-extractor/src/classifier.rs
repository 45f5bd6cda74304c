//! Input classification: one request or many

use serde::{Deserialize, Serialize};

/// Shape the model is asked to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// One JSON object
    Single,
    /// A JSON array, one object per request line
    Batch,
}

/// Result of classifying raw input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<'a> {
    /// Single or batch
    pub mode: InputMode,
    /// Non-empty request lines, trimmed and stripped of list markers
    pub lines: Vec<&'a str>,
}

impl Classification<'_> {
    /// Whether the input had no content at all
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Classify raw text by counting its non-empty request lines
///
/// Empty input classifies as `Single` with no lines.
pub fn classify(text: &str) -> Classification<'_> {
    let lines: Vec<&str> = text
        .lines()
        .map(|line| strip_list_marker(line.trim()))
        .filter(|line| !line.is_empty())
        .collect();

    let mode = if lines.len() > 1 {
        InputMode::Batch
    } else {
        InputMode::Single
    };

    Classification { mode, lines }
}

/// Remove a leading bullet (`-`, `*`, `•`) or ordinal (`1.`, `2)`) marker
///
/// A marker only counts when followed by whitespace or the end of the line,
/// so `2.5 tonnes` and `-5 degrees` are left alone.
fn strip_list_marker(line: &str) -> &str {
    for bullet in ['-', '*', '•'] {
        if let Some(rest) = line.strip_prefix(bullet) {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return rest.trim_start();
            }
        }
    }

    let digits = line.bytes().take_while(|b| b.is_ascii_digit()).count();
    if (1..=3).contains(&digits) {
        let rest = &line[digits..];
        if let Some(after) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            if after.is_empty() || after.starts_with(char::is_whitespace) {
                return after.trim_start();
            }
        }
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_is_single() {
        let c = classify("Need 350 bags of cement for Mumbai site");
        assert_eq!(c.mode, InputMode::Single);
        assert_eq!(c.lines, vec!["Need 350 bags of cement for Mumbai site"]);
    }

    #[test]
    fn test_multiple_lines_is_batch() {
        let c = classify("50 bags cement\n\n  20 tonnes sand  \r\n10 m3 gravel\n");
        assert_eq!(c.mode, InputMode::Batch);
        assert_eq!(c.lines, vec!["50 bags cement", "20 tonnes sand", "10 m3 gravel"]);
    }

    #[test]
    fn test_empty_input_is_single_with_no_lines() {
        for text in ["", "   ", "\n\n\t\n"] {
            let c = classify(text);
            assert_eq!(c.mode, InputMode::Single);
            assert!(c.is_empty());
        }
    }

    #[test]
    fn test_list_markers_are_stripped() {
        let c = classify("- 50 bags cement\n* 20 tonnes sand\n• steel rods\n1. bricks\n2) tiles");
        assert_eq!(
            c.lines,
            vec!["50 bags cement", "20 tonnes sand", "steel rods", "bricks", "tiles"]
        );
    }

    #[test]
    fn test_marker_only_lines_are_dropped() {
        let c = classify("-\n  * \n40 bags cement");
        assert_eq!(c.mode, InputMode::Single);
        assert_eq!(c.lines, vec!["40 bags cement"]);
    }

    #[test]
    fn test_numbers_are_not_mistaken_for_markers() {
        assert_eq!(strip_list_marker("2.5 tonnes of sand"), "2.5 tonnes of sand");
        assert_eq!(strip_list_marker("-5 degrees"), "-5 degrees");
        assert_eq!(strip_list_marker("350 bags"), "350 bags");
        assert_eq!(strip_list_marker("2024. was a year"), "2024. was a year");
    }
}
