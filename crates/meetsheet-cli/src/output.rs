//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use meetsheet_domain::{EventRecord, MeetInfo, TraceEntry, TraceKind};
use meetsheet_extractor::{DocumentAnalysis, ParseOutcome};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a parse result.
    ///
    /// JSON output is the export document; table output shows the meet
    /// info, the event table and a per-gender summary.
    pub fn format_outcome(&self, outcome: &ParseOutcome, wrap_meet_info: bool) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(outcome.to_json(wrap_meet_info)?),
            OutputFormat::Table => {
                let (girls, boys, mixed, unspecified) = outcome.gender_counts();
                let summary = format!(
                    "{} events (F: {}, M: {}, Mixed: {}, unspecified: {})",
                    outcome.event_count(),
                    girls,
                    boys,
                    mixed,
                    unspecified
                );
                Ok(format!(
                    "{}\n\n{}\n{}",
                    self.format_meet_info(&outcome.meet_info),
                    self.format_events(&outcome.events),
                    self.success(&summary)
                ))
            }
        }
    }

    /// Format meet metadata as labelled lines.
    pub fn format_meet_info(&self, info: &MeetInfo) -> String {
        let mut lines = vec![self.colorize(info.display_name(), "cyan")];

        let fields = [
            ("Date", &info.date),
            ("Max events per day", &info.max_events_per_day),
            ("Max total events", &info.max_total_events),
            ("Max sessions", &info.max_sessions),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                lines.push(format!("  {}: {}", label, value));
            }
        }

        lines.join("\n")
    }

    /// Format events as a table.
    pub fn format_events(&self, events: &[EventRecord]) -> String {
        if events.is_empty() {
            return self.colorize("No events found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Day", "Session", "Description", "Age Group", "Gender", "Stroke"]);

        for event in events {
            builder.push_record([
                event.event_number.to_string(),
                event.day.clone().unwrap_or_default(),
                event.session.clone().unwrap_or_default(),
                event.description.clone(),
                event.age_group.clone().unwrap_or_default(),
                event.event_gender.map(|g| g.to_string()).unwrap_or_default(),
                event.stroke.clone().unwrap_or_default(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format trace entries, one per line.
    pub fn format_trace(&self, entries: &[TraceEntry]) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(entries)?);
        }

        let lines: Vec<String> = entries
            .iter()
            .map(|entry| {
                let line = format!(
                    "[{}] {:<14} {}",
                    entry.timestamp.format("%H:%M:%S%.3f"),
                    entry.kind.to_string(),
                    entry.message
                );
                let color = match entry.kind {
                    TraceKind::Success => "green",
                    TraceKind::Warning => "yellow",
                    TraceKind::Error => "red",
                    TraceKind::ChunkBoundary => "magenta",
                    TraceKind::RawResponse => "blue",
                    TraceKind::Info => "",
                };
                self.colorize(&line, color)
            })
            .collect();

        Ok(lines.join("\n"))
    }

    /// Format a document analysis report.
    pub fn format_analysis(&self, analysis: &DocumentAnalysis) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(analysis)?);
        }

        let mut out = Vec::new();

        out.push(self.colorize("PAGES", "cyan"));
        out.push(format!(
            "  Total: {}   With events: {}   Avg chars/page: {}   Total chars: {}",
            analysis.pages.len(),
            analysis.pages_with_events(),
            analysis.average_page_chars(),
            analysis.total_characters
        ));
        if !analysis.pages.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["Page", "Chars", "Lines", "Events", "Preview"]);
            for page in &analysis.pages {
                builder.push_record([
                    page.page_number.to_string(),
                    page.characters.to_string(),
                    page.lines.to_string(),
                    page.event_matches.to_string(),
                    page.preview.clone(),
                ]);
            }
            let mut table = builder.build();
            table.with(Style::rounded());
            out.push(table.to_string());
        }

        out.push(String::new());
        out.push(self.colorize("EVENTS", "cyan"));
        out.push(format!("  Detected: {}", analysis.event_numbers.len()));
        match analysis.event_range() {
            Some((min, max)) => out.push(format!("  Range: {} - {}", min, max)),
            None => out.push("  Range: n/a".to_string()),
        }
        if analysis.gaps.is_empty() {
            out.push("  No gaps detected".to_string());
        } else {
            let gaps: Vec<String> = analysis
                .gaps
                .iter()
                .map(|g| format!("{}..{} ({} missing)", g.after, g.before, g.size()))
                .collect();
            out.push(format!("  Gaps ({}): {}", gaps.len(), gaps.join(", ")));
        }

        out.push(String::new());
        out.push(self.colorize("CHUNK ESTIMATES", "cyan"));
        let mut builder = Builder::default();
        builder.push_record(["Preset", "Size", "Overlap", "Step", "Chunks"]);
        for estimate in &analysis.chunk_estimates {
            builder.push_record([
                estimate.preset.label().to_string(),
                estimate.chunk_size.to_string(),
                estimate.overlap.to_string(),
                estimate.step.to_string(),
                estimate.chunks.to_string(),
            ]);
        }
        let mut table = builder.build();
        table.with(Style::rounded());
        out.push(table.to_string());

        out.push(String::new());
        if analysis.is_clean() {
            out.push(self.success("Content quality: good"));
        } else {
            out.push(self.warning("Content quality: has issues"));
            for issue in &analysis.issues {
                out.push(format!("  - {}", issue));
            }
        }
        out.push(format!(
            "  Words: {}   Avg word length: {:.1}   Special chars: {:.1}%",
            analysis.word_count,
            analysis.average_word_length,
            analysis.special_char_ratio * 100.0
        ));

        out.push(String::new());
        out.push(self.colorize("RECOMMENDATIONS", "cyan"));
        for recommendation in &analysis.recommendations {
            out.push(format!("  - {}", recommendation));
        }

        Ok(out.join("\n"))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetsheet_domain::{Gender, RunId, TraceLog};
    use meetsheet_extractor::analyze;

    fn outcome() -> ParseOutcome {
        ParseOutcome {
            run_id: RunId::new(),
            meet_info: MeetInfo {
                name: Some("Fall Classic".to_string()),
                max_events_per_day: Some("3 events per day".to_string()),
                ..Default::default()
            },
            events: vec![
                EventRecord::new(39, "10 & Under 100 IM")
                    .with_gender(Gender::F)
                    .with_day("Friday")
                    .with_session("PM"),
                EventRecord::new(40, "10 & Under 100 IM").with_gender(Gender::M),
            ],
        }
    }

    #[test]
    fn test_table_outcome() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_outcome(&outcome(), false).unwrap();

        assert!(output.starts_with("Fall Classic"));
        assert!(output.contains("Max events per day: 3 events per day"));
        assert!(output.contains("Description"));
        assert!(output.contains("10 & Under 100 IM"));
        assert!(output.contains("2 events (F: 1, M: 1"));
    }

    #[test]
    fn test_json_outcome() {
        let formatter = Formatter::new(OutputFormat::Json, false);

        let bare = formatter.format_outcome(&outcome(), false).unwrap();
        assert!(bare.trim_start().starts_with('['));

        let wrapped = formatter.format_outcome(&outcome(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&wrapped).unwrap();
        assert_eq!(value["meetInfo"]["name"], "Fall Classic");
    }

    #[test]
    fn test_empty_events() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert!(formatter.format_events(&[]).contains("No events found"));
    }

    #[test]
    fn test_unknown_meet_name() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.format_meet_info(&MeetInfo::unknown()), "Unknown Meet");
    }

    #[test]
    fn test_trace_lines() {
        let mut trace = TraceLog::new();
        trace.info("Classifying 3 pages");
        trace.error("Chunk 2: Network error: HTTP 503");

        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_trace(trace.entries()).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("info") && lines[0].ends_with("Classifying 3 pages"));
        assert!(lines[1].contains("error"));

        let json = Formatter::new(OutputFormat::Json, false)
            .format_trace(trace.entries())
            .unwrap();
        assert!(json.contains("\"kind\": \"error\""));
    }

    #[test]
    fn test_analysis_report() {
        let analysis = analyze("PAGE 1:\nEvent 1 Girls 50 Free\nEvent 4 Boys 50 Free\n");
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_analysis(&analysis).unwrap();

        assert!(output.contains("Range: 1 - 4"));
        assert!(output.contains("1..4 (2 missing)"));
        assert!(output.contains("very-small"));
        assert!(output.contains("Very short text"));
        assert!(output.contains("RECOMMENDATIONS"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("careful"), "⚠ careful");
    }
}
