//! Meetsheet CLI - Turn swim meet program text into a structured event list.

use clap::Parser;
use meetsheet_cli::commands;
use meetsheet_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> meetsheet_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Load settings, falling back to defaults when the file is absent.
    // A broken file only blocks the commands that depend on it.
    let config_path = Config::resolve_path(cli.config.as_deref())?;
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) if matches!(cli.command, Command::Config(_)) => {
            eprintln!("Warning: {}; using defaults", e);
            Config::default()
        }
        Err(e) => return Err(e),
    };

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    // Handle commands
    match cli.command {
        Command::Parse(args) => {
            commands::execute_parse(args, &config, &formatter).await?;
        }
        Command::Analyze(args) => {
            commands::execute_analyze(args, &formatter)?;
        }
        Command::Config(args) => {
            commands::execute_config(args, &config, &config_path, &formatter)?;
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
