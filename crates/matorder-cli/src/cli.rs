//! CLI command definitions and argument parsing.

use crate::config::{OutputFormat, ProviderKind};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Matorder - Turn free-form material requests into structured records.
#[derive(Debug, Parser)]
#[command(name = "matorder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "MATORDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the configured provider
    #[arg(short, long, value_enum, global = true)]
    pub provider: Option<CliProvider>,

    /// Override the configured model
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Print run metadata to stderr
    #[arg(long, global = true)]
    pub report: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Compact JSON
    Json,
    /// Indented JSON (default)
    Pretty,
    /// Table
    Table,
}

/// Provider options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliProvider {
    /// Local Ollama server
    Ollama,
    /// Groq hosted API
    Groq,
    /// Offline mock
    Mock,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse one request (or one request per line)
    Parse(ParseArgs),

    /// Parse a file line by line into an input/output JSON file
    Batch(BatchArgs),

    /// Print the prompt that would be sent, without calling the model
    Prompt(PromptArgs),

    /// Enter interactive REPL mode
    Repl,

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the parse command.
#[derive(Debug, Parser)]
pub struct ParseArgs {
    /// Request text
    pub text: Option<String>,

    /// Read the request text from a file
    #[arg(short = 'i', long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Read the request text from stdin
    #[arg(long, conflicts_with_all = ["text", "file"])]
    pub stdin: bool,
}

/// Arguments for the batch command.
#[derive(Debug, Parser)]
pub struct BatchArgs {
    /// Input file, one request per line
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output JSON file
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Arguments for the prompt command.
#[derive(Debug, Parser)]
pub struct PromptArgs {
    /// Request text
    pub text: Option<String>,

    /// Read the request text from a file
    #[arg(short = 'i', long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Read the request text from stdin
    #[arg(long, conflicts_with_all = ["text", "file"])]
    pub stdin: bool,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Pretty => OutputFormat::Pretty,
            CliFormat::Table => OutputFormat::Table,
        }
    }
}

impl From<CliProvider> for ProviderKind {
    fn from(provider: CliProvider) -> Self {
        match provider {
            CliProvider::Ollama => ProviderKind::Ollama,
            CliProvider::Groq => ProviderKind::Groq,
            CliProvider::Mock => ProviderKind::Mock,
        }
    }
}
