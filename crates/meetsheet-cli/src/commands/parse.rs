//! Parse command implementation.

use crate::cli::{ParseArgs, StrategyArg};
use crate::commands::read_input;
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use meetsheet_domain::TraceLog;
use meetsheet_extractor::{MeetParser, ParserConfig};
use meetsheet_llm::ChatCompletionProvider;
use std::fs;
use tracing::info;

/// Execute the parse command.
pub async fn execute_parse(args: ParseArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let text = read_input(&args.input)?;
    let parser = build_parser(&args, config)?;

    info!(
        "Parsing {} with strategies {:?}",
        args.input,
        parser.strategy_names()
    );

    let mut trace = TraceLog::new();
    let result = parser.parse(&text, &mut trace).await;

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            if args.show_trace {
                eprintln!("{}", formatter.format_trace(trace.entries())?);
            }
            return Err(e.into());
        }
    };

    println!("{}", formatter.format_outcome(&outcome, args.wrap_meet_info)?);

    if args.show_trace {
        // Keep stdout clean for JSON consumers
        if formatter.format() == OutputFormat::Json {
            eprintln!("{}", formatter.format_trace(trace.entries())?);
        } else {
            println!("\n{}", formatter.format_trace(trace.entries())?);
        }
    }

    if let Some(path) = &args.output {
        fs::write(path, outcome.to_json(args.wrap_meet_info)?)?;
        eprintln!(
            "{}",
            formatter.success(&format!("Wrote {} events to {}", outcome.event_count(), path.display()))
        );
    }

    Ok(())
}

/// Settings file values with command-line overrides applied.
///
/// `--chunk-size` wins over `--preset`.
pub fn resolve_parser_config(args: &ParseArgs, base: &ParserConfig) -> Result<ParserConfig> {
    let mut config = base.clone();

    if let Some(preset) = args.preset {
        config = config.with_preset(preset);
    }
    if let Some(size) = args.chunk_size {
        config.chunk_size = size;
    }
    if let Some(overlap) = args.overlap {
        config.overlap_fraction = overlap;
    }
    if let Some(delay) = args.delay_ms {
        config.chunk_delay_ms = delay;
    }

    config.validate().map_err(CliError::InvalidInput)?;
    Ok(config)
}

/// Build the pipeline for the selected strategy.
pub fn build_parser(args: &ParseArgs, config: &Config) -> Result<MeetParser> {
    let parser_config = resolve_parser_config(args, &config.parser)?;

    if !args.strategy.needs_credential() {
        return Ok(MeetParser::pattern(parser_config));
    }

    let api_key = args
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or(CliError::MissingApiKey)?;
    let provider = ChatCompletionProvider::new(api_key, config.provider.clone())?;

    Ok(match args.strategy {
        StrategyArg::Combined => MeetParser::combined(provider, parser_config),
        _ => MeetParser::prompted(provider, parser_config),
    })
}
