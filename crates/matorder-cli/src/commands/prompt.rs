//! Prompt command implementation.

use crate::cli::PromptArgs;
use crate::commands::read_input;
use crate::error::Result;
use matorder_domain::traits::LlmProvider;
use matorder_extractor::MaterialParser;
use std::fmt::Display;

/// Execute the prompt command.
pub fn execute_prompt<L>(args: PromptArgs, parser: &MaterialParser<L>) -> Result<()>
where
    L: LlmProvider + Sync,
    L::Error: Display,
{
    let text = read_input(args.text, args.file.as_deref(), args.stdin)?;
    let prompts = parser.prompts_for(&text);
    let total = prompts.len();

    for (idx, prompt) in prompts.iter().enumerate() {
        if total > 1 {
            println!("===== prompt {}/{} =====", idx + 1, total);
        }
        println!("{}", prompt);
    }
    Ok(())
}
