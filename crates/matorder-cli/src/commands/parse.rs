//! Parse command implementation.

use crate::cli::ParseArgs;
use crate::commands::read_input;
use crate::error::Result;
use crate::output::Formatter;
use matorder_domain::traits::LlmProvider;
use matorder_extractor::MaterialParser;
use std::fmt::Display;

/// Execute the parse command.
pub fn execute_parse<L>(
    args: ParseArgs,
    parser: &MaterialParser<L>,
    formatter: &Formatter,
    report: bool,
) -> Result<()>
where
    L: LlmProvider + Sync,
    L::Error: Display,
{
    let text = read_input(args.text, args.file.as_deref(), args.stdin)?;
    println!("{}", parse_and_format(&text, parser, formatter, report)?);
    Ok(())
}

/// Parse `text` and render the output; the report, if asked for, goes to stderr.
pub(crate) fn parse_and_format<L>(
    text: &str,
    parser: &MaterialParser<L>,
    formatter: &Formatter,
    report: bool,
) -> Result<String>
where
    L: LlmProvider + Sync,
    L::Error: Display,
{
    let result = parser.parse_with_report(text);
    if report {
        eprintln!("{}", formatter.report_summary(&result.metadata, &result.items));
    }
    formatter.format_output(&result.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use matorder_extractor::ExtractorConfig;
    use matorder_llm::MockProvider;

    #[test]
    fn test_parse_and_format_single() {
        let llm = MockProvider::new(r#"{"material_name": "cement", "quantity": 50, "unit": "bags"}"#);
        let parser = MaterialParser::new(llm, ExtractorConfig::default()).unwrap();
        let formatter = Formatter::new(OutputFormat::Json, false);

        let text = parse_and_format("50 bags cement", &parser, &formatter, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["material_name"], "cement");
        assert_eq!(value["quantity"], 50);
        assert_eq!(value.as_object().map(|o| o.len()), Some(7));
    }

    #[test]
    fn test_parse_and_format_multiline_is_array() {
        let parser = MaterialParser::new(MockProvider::new("no json"), ExtractorConfig::default())
            .unwrap();
        let formatter = Formatter::new(OutputFormat::Json, false);

        let text = parse_and_format("sand\ngravel", &parser, &formatter, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["material_name"], "sand");
        assert_eq!(value[1]["material_name"], "gravel");
    }
}
