//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use meetsheet_extractor::ChunkPreset;
use std::path::PathBuf;

/// Meetsheet - Turn swim meet program text into a structured event list.
#[derive(Debug, Parser)]
#[command(name = "meetsheet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a page-marked program into events
    Parse(ParseArgs),

    /// Report pages, event numbers and chunk estimates without extracting
    Analyze(AnalyzeArgs),

    /// Show or create the settings file
    Config(ConfigArgs),
}

/// Extraction strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StrategyArg {
    /// Completion service only
    Prompted,
    /// Fixed row patterns only, no network
    Pattern,
    /// Completion service, then patterns filling the gaps
    Combined,
}

impl StrategyArg {
    /// Whether the strategy needs a completion service credential
    pub fn needs_credential(&self) -> bool {
        !matches!(self, StrategyArg::Pattern)
    }
}

/// Arguments for the parse command.
#[derive(Debug, Parser)]
pub struct ParseArgs {
    /// Input text file with PAGE markers, or "-" for stdin
    pub input: String,

    /// Extraction strategy
    #[arg(short, long, value_enum, default_value = "prompted")]
    pub strategy: StrategyArg,

    /// Completion service API key
    #[arg(long, env = "DEEPSEEK_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Write the JSON export to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export {"meetInfo": ..., "events": [...]} instead of a bare event array
    #[arg(long)]
    pub wrap_meet_info: bool,

    /// Chunk size preset (large, medium, small, very-small)
    #[arg(long)]
    pub preset: Option<ChunkPreset>,

    /// Chunk size in characters (overrides --preset)
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Overlap fraction between chunks, in [0, 1)
    #[arg(long)]
    pub overlap: Option<f64>,

    /// Pause between completion calls (milliseconds)
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Print the trace log after the results
    #[arg(long)]
    pub show_trace: bool,
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Input text file with PAGE markers, or "-" for stdin
    pub input: String,
}

/// Arguments for settings management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Settings management actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective settings
    Show,

    /// Write a default settings file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the settings file location
    Path,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}
