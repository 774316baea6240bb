//! Analyze command implementation.

use crate::cli::AnalyzeArgs;
use crate::commands::read_input;
use crate::error::Result;
use crate::output::Formatter;
use meetsheet_extractor::analyze;

/// Execute the analyze command.
pub fn execute_analyze(args: AnalyzeArgs, formatter: &Formatter) -> Result<()> {
    let text = read_input(&args.input)?;
    let analysis = analyze(&text);

    println!("{}", formatter.format_analysis(&analysis)?);

    Ok(())
}
