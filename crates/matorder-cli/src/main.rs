//! Matorder CLI - Turn free-form material requests into structured records.

use clap::Parser;
use matorder_cli::commands;
use matorder_cli::repl;
use matorder_cli::{Cli, Command, Config, Formatter, Provider};
use matorder_extractor::MaterialParser;
use tracing_subscriber::EnvFilter;

// Network providers block on their own runtime, so main must not be async
fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; RUST_LOG wins over -v
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(cli: Cli) -> matorder_cli::Result<()> {
    let config_path = Config::resolve_path(cli.config.as_deref())?;
    let mut config = Config::load_from(&config_path)?;

    // Command-line overrides
    if let Some(provider) = cli.provider {
        config.provider.kind = provider.into();
    }
    if let Some(model) = cli.model {
        config.provider.model = Some(model);
    }

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let command = match cli.command {
        Some(Command::Config(args)) => {
            return commands::execute_config(args, &config, &config_path, &formatter);
        }
        other => other,
    };

    let provider = Provider::from_config(&config.provider)?;
    let parser = MaterialParser::new(provider, config.extractor.clone())?;

    match command {
        None | Some(Command::Repl) => repl::run_repl(&parser, &formatter, cli.report),
        Some(Command::Parse(args)) => commands::execute_parse(args, &parser, &formatter, cli.report),
        Some(Command::Batch(args)) => commands::execute_batch(args, &parser, &formatter),
        Some(Command::Prompt(args)) => commands::execute_prompt(args, &parser),
        Some(Command::Config(_)) => Ok(()),
    }
}
