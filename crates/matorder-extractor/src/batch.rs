//! Batch coordination: one outcome per request line, in input order
//!
//! Each line is isolated: a gateway error or unparseable response on one
//! line produces a fallback for that line only.

use crate::fallback::{FallbackHandler, FallbackReason};
use crate::types::{ItemOutcome, RecordSource};
use matorder_domain::Record;
use rayon::prelude::*;
use tracing::{debug, warn};

/// Run `extract` on every line sequentially
pub fn run_per_line<F>(lines: &[&str], extract: F) -> Vec<ItemOutcome>
where
    F: Fn(&str) -> ItemOutcome,
{
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            debug!("Processing line {}/{}", idx + 1, lines.len());
            extract(line)
        })
        .collect()
}

/// Run `extract` on every line using up to `max_parallelism` threads
///
/// Output positions still match input positions. If the pool cannot be
/// built the lines are processed sequentially.
pub fn run_parallel<F>(lines: &[&str], max_parallelism: usize, extract: F) -> Vec<ItemOutcome>
where
    F: Fn(&str) -> ItemOutcome + Sync,
{
    match rayon::ThreadPoolBuilder::new()
        .num_threads(max_parallelism.max(1))
        .build()
    {
        Ok(pool) => pool.install(|| lines.par_iter().map(|line| extract(line)).collect()),
        Err(e) => {
            warn!("Could not build worker pool ({}), processing sequentially", e);
            run_per_line(lines, extract)
        }
    }
}

/// Match the records from one combined model call to the input lines
///
/// Position `i` of the response belongs to line `i`. Missing or unusable
/// positions get that line's fallback; surplus elements are dropped. If the
/// response failed as a whole, every line falls back with the same reason.
pub fn align_combined(
    lines: &[&str],
    response: Result<Vec<Option<Record>>, FallbackReason>,
    fallback: &FallbackHandler,
) -> Vec<ItemOutcome> {
    let mut records: Vec<Result<Option<Record>, FallbackReason>> = match response {
        Ok(records) => {
            if records.len() != lines.len() {
                warn!(
                    "Combined response had {} items for {} lines",
                    records.len(),
                    lines.len()
                );
            }
            records.into_iter().map(Ok).collect()
        }
        Err(reason) => vec![Err(reason); lines.len()],
    };
    records.resize(lines.len(), Err(FallbackReason::MissingBatchItem));

    lines
        .iter()
        .zip(records)
        .map(|(line, slot)| match slot {
            Ok(Some(record)) if !record.is_empty() => ItemOutcome {
                input: line.to_string(),
                record,
                source: RecordSource::Extracted,
            },
            Ok(_) => fallback_outcome(line, FallbackReason::Unusable, fallback),
            Err(reason) => fallback_outcome(line, reason, fallback),
        })
        .collect()
}

/// Fallback outcome for one line
pub fn fallback_outcome(
    input: &str,
    reason: FallbackReason,
    fallback: &FallbackHandler,
) -> ItemOutcome {
    warn!("Falling back for input ({}): {:.60}", reason, input);
    ItemOutcome {
        input: input.to_string(),
        record: fallback.record_for(input),
        source: RecordSource::fallback(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracted(line: &str) -> ItemOutcome {
        ItemOutcome {
            input: line.to_string(),
            record: Record::with_material(line.to_uppercase()),
            source: RecordSource::Extracted,
        }
    }

    #[test]
    fn test_per_line_preserves_order() {
        let lines = ["sand", "gravel", "cement"];
        let outcomes = run_per_line(&lines, extracted);
        let inputs: Vec<&str> = outcomes.iter().map(|o| o.input.as_str()).collect();
        assert_eq!(inputs, lines.to_vec());
    }

    #[test]
    fn test_parallel_preserves_order() {
        let lines: Vec<String> = (0..50).map(|i| format!("line {}", i)).collect();
        let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();

        let outcomes = run_parallel(&refs, 8, extracted);
        assert_eq!(outcomes.len(), 50);
        for (idx, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.input, format!("line {}", idx));
        }
    }

    #[test]
    fn test_align_combined_pads_missing_items() {
        let handler = FallbackHandler::default();
        let lines = ["50 bags cement", "20 tonnes sand", "10 m3 gravel"];
        let response = Ok(vec![Some(Record::with_material("cement"))]);

        let outcomes = align_combined(&lines, response, &handler);
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].source, RecordSource::Extracted);
        assert_eq!(
            outcomes[1].source,
            RecordSource::fallback(FallbackReason::MissingBatchItem)
        );
        assert_eq!(outcomes[1].record, Record::with_material("sand"));
        assert_eq!(outcomes[2].record, Record::with_material("gravel"));
    }

    #[test]
    fn test_align_combined_drops_surplus_and_unusable() {
        let handler = FallbackHandler::default();
        let lines = ["bricks", "tiles"];
        let response = Ok(vec![
            None,
            Some(Record::with_material("tiles")),
            Some(Record::with_material("extra")),
        ]);

        let outcomes = align_combined(&lines, response, &handler);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].source, RecordSource::fallback(FallbackReason::Unusable));
        assert_eq!(outcomes[0].record, Record::with_material("bricks"));
        assert_eq!(outcomes[1].record, Record::with_material("tiles"));
    }

    #[test]
    fn test_align_combined_whole_failure() {
        let handler = FallbackHandler::default();
        let lines = ["a", "b"];
        let outcomes = align_combined(&lines, Err(FallbackReason::Extraction), &handler);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes
            .iter()
            .all(|o| o.source == RecordSource::fallback(FallbackReason::Extraction)));
        assert!(outcomes.iter().all(|o| o.record.is_empty()));
    }
}
