//! Batch command implementation.
//!
//! Every non-empty line of the input file is parsed on its own, so a failing
//! line never affects its neighbours.

use crate::cli::BatchArgs;
use crate::error::Result;
use crate::output::Formatter;
use matorder_domain::traits::LlmProvider;
use matorder_extractor::{classify, MaterialParser, ParseOutput};
use serde::Serialize;
use std::fmt::Display;
use std::fs;
use tracing::info;

/// One line of the output file.
#[derive(Debug, Serialize)]
pub struct BatchEntry {
    /// Request line, trimmed and without its list marker
    pub input: String,
    /// Wire-format record for that line
    pub output: ParseOutput,
}

/// Execute the batch command.
pub fn execute_batch<L>(args: BatchArgs, parser: &MaterialParser<L>, formatter: &Formatter) -> Result<()>
where
    L: LlmProvider + Sync,
    L::Error: Display,
{
    let contents = fs::read_to_string(&args.input)?;
    let entries = run_batch(&contents, parser);

    fs::write(&args.output, serde_json::to_string_pretty(&entries)?)?;

    println!(
        "{}",
        formatter.success(&format!(
            "Parsed {} request(s) into {}",
            entries.len(),
            args.output.display()
        ))
    );
    Ok(())
}

/// Parse each request line independently.
///
/// Lines are split and cleaned exactly as `parse` would split them.
pub fn run_batch<L>(contents: &str, parser: &MaterialParser<L>) -> Vec<BatchEntry>
where
    L: LlmProvider + Sync,
    L::Error: Display,
{
    let lines = classify(contents).lines;
    info!("Batch file has {} request line(s)", lines.len());

    lines
        .into_iter()
        .map(|line| BatchEntry {
            input: line.to_string(),
            output: parser.parse(line),
        })
        .collect()
}
