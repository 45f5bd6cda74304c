//! Interactive REPL (Read-Eval-Print Loop) mode.
//!
//! Each entered line is parsed as one request. A few words are reserved for
//! REPL control.

use crate::commands::parse::parse_and_format;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use matorder_domain::traits::LlmProvider;
use matorder_extractor::MaterialParser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fmt::Display;
use std::path::PathBuf;

/// Run the interactive REPL.
pub fn run_repl<L>(parser: &MaterialParser<L>, formatter: &Formatter, report: bool) -> Result<()>
where
    L: LlmProvider + Sync,
    L::Error: Display,
{
    println!(
        "{}",
        formatter.info("Matorder REPL - Type a material request, 'help' for commands, 'exit' to quit")
    );
    println!(
        "{}",
        formatter.info(&format!(
            "Batch strategy {:?}, temperature {}",
            parser.config().batch_strategy,
            parser.config().temperature
        ))
    );
    println!();

    let mut editor = DefaultEditor::new().map_err(|e| {
        CliError::Io(std::io::Error::other(format!(
            "Failed to initialize editor: {}",
            e
        )))
    })?;

    // History is best effort
    let history_path = get_history_path().ok();
    if let Some(path) = &history_path {
        let _ = editor.load_history(path);
    }

    let mut show_report = report;

    loop {
        match editor.readline("matorder> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    ReplCommand::Exit => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    ReplCommand::Help => print_help(formatter),
                    ReplCommand::ToggleReport => {
                        show_report = !show_report;
                        let state = if show_report { "on" } else { "off" };
                        println!("{}", formatter.info(&format!("Run report {}", state)));
                    }
                    ReplCommand::Parse(text) => {
                        match parse_and_format(&text, parser, formatter, show_report) {
                            Ok(output) => println!("{}", output),
                            Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    if let Some(path) = &history_path {
        editor.save_history(path).ok();
    }

    Ok(())
}

/// REPL command type.
#[derive(Debug, PartialEq)]
enum ReplCommand {
    Exit,
    Help,
    ToggleReport,
    Parse(String),
}

/// Interpret a REPL line; anything that is not a control word is a request.
fn parse_repl_command(line: &str) -> ReplCommand {
    match line {
        "exit" | "quit" | "q" => ReplCommand::Exit,
        "help" | "?" => ReplCommand::Help,
        "report" => ReplCommand::ToggleReport,
        // Literal "\n" lets a single REPL line carry a batch
        _ => ReplCommand::Parse(line.replace("\\n", "\n")),
    }
}

fn get_history_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    let matorder_dir = home.join(".matorder");
    std::fs::create_dir_all(&matorder_dir)?;
    Ok(matorder_dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  <request text>      - Parse a material request");
    println!("  <line>\\n<line>      - Parse several requests as a batch");
    println!("  report              - Toggle the run report on stderr");
    println!("  help, ?             - Show this help");
    println!("  exit, quit, q       - Exit REPL");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_words() {
        assert_eq!(parse_repl_command("exit"), ReplCommand::Exit);
        assert_eq!(parse_repl_command("q"), ReplCommand::Exit);
        assert_eq!(parse_repl_command("?"), ReplCommand::Help);
        assert_eq!(parse_repl_command("report"), ReplCommand::ToggleReport);
    }

    #[test]
    fn test_request_lines() {
        assert_eq!(
            parse_repl_command("50 bags cement asap"),
            ReplCommand::Parse("50 bags cement asap".to_string())
        );
        assert_eq!(
            parse_repl_command("sand\\ngravel"),
            ReplCommand::Parse("sand\ngravel".to_string())
        );
    }
}
