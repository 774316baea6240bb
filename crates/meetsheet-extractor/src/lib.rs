//! Meetsheet Extractor
//!
//! Turns the text of a swim-meet program into a deduplicated, sorted list of
//! events plus meet-wide metadata.
//!
//! # Overview
//!
//! Program text arrives with `PAGE <n>:` markers but is otherwise noisy:
//! line breaks are lost, columns bleed together and OCR splits digits. The
//! pipeline classifies pages, summarizes the meet rules, cuts the event text
//! into overlapping windows, extracts candidates with one or more strategies
//! and reconciles duplicates by event number.
//!
//! # Architecture
//!
//! ```text
//! Text → PageClassifier → (context summary) + event text
//!      → Chunker → ExtractionStrategy → Reconciler → ParseOutcome
//! ```
//!
//! # Key Features
//!
//! - **Two strategies**: a prompted one backed by a completion service and a
//!   deterministic pattern one for common row layouts
//! - **Truncation repair**: cut-off JSON responses are closed and re-parsed
//! - **Graceful degradation**: chunk failures are traced, never fatal
//! - **Trace log**: every decision is recorded in a caller-owned [`TraceLog`]
//! - **Analyzer**: pre-flight report of pages, event numbers and chunk counts
//!
//! # Example Usage
//!
//! ```no_run
//! use meetsheet_extractor::{MeetParser, ParserConfig};
//! use meetsheet_domain::TraceLog;
//! use meetsheet_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = MockProvider::new(r#"{"meetInfo": null, "events": []}"#);
//! let parser = MeetParser::combined(provider, ParserConfig::default());
//!
//! let mut trace = TraceLog::new();
//! let text = std::fs::read_to_string("program.txt")?;
//! let outcome = parser.parse(&text, &mut trace).await?;
//!
//! println!("{}: {} events", outcome.meet_info.display_name(), outcome.events.len());
//! println!("{}", outcome.to_json(true)?);
//! # Ok(())
//! # }
//! ```
//!
//! [`TraceLog`]: meetsheet_domain::TraceLog

#![warn(missing_docs)]

mod error;
mod config;
mod types;
mod normalizer;
mod classifier;
mod context;
mod chunking;
mod repair;
mod parser;
mod prompt;
mod prompted;
mod stroke;
mod pattern;
mod reconciler;
mod extractor;
mod analysis;


pub use error::ExtractorError;
pub use config::{ChunkPreset, ParserConfig, ScoringPolicy};
pub use types::ParseOutcome;
pub use normalizer::normalize;
pub use classifier::{classify_text, clean_page, context_text, event_text, PageClassifier};
pub use context::summarize_context;
pub use chunking::{estimate_chunk_count, Chunker};
pub use repair::{count_unescaped_quotes, repair_truncated_json};
pub use parser::{parse_payload, strip_code_fence, ParsedPayload};
pub use prompt::{PromptBuilder, DEFAULT_MAX_TOKENS};
pub use prompted::{interpret_response, PromptedExtractor};
pub use stroke::{extract_stroke, normalize_stroke, STROKE_TABLE, UNKNOWN_STROKE};
pub use pattern::{detect_layout, PatternExtractor, RowLayout};
pub use reconciler::{MergeSummary, Reconciler};
pub use extractor::MeetParser;
pub use analysis::{
    analyze, detect_event_numbers, find_gaps, ChunkEstimate, DocumentAnalysis, EventGap,
    PageStats, ESTIMATE_OVERLAP,
};
