//! Core pipeline driver

use crate::chunking::Chunker;
use crate::classifier::{context_text, event_text, PageClassifier};
use crate::config::ParserConfig;
use crate::context::summarize_context;
use crate::error::ExtractorError;
use crate::pattern::PatternExtractor;
use crate::prompted::PromptedExtractor;
use crate::reconciler::Reconciler;
use crate::types::ParseOutcome;
use meetsheet_domain::{
    CompletionProvider, ExtractionStrategy, MeetInfo, PageKind, RunId, TraceLog,
};
use tracing::{debug, info, warn};

/// The MeetParser turns page-marked program text into a canonical event list
///
/// Strategies run in registration order over the same event text; their
/// candidates all flow into one reconciler.
pub struct MeetParser {
    config: ParserConfig,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl MeetParser {
    /// Create a parser with no strategies registered
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            strategies: Vec::new(),
        }
    }

    /// Register a strategy; strategies run in the order they are added
    pub fn with_strategy(mut self, strategy: impl ExtractionStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Parser using only the pattern strategy
    pub fn pattern(config: ParserConfig) -> Self {
        Self::new(config).with_strategy(PatternExtractor::new())
    }

    /// Parser using only the prompted strategy, bounded by the configured timeout
    pub fn prompted<P>(provider: P, config: ParserConfig) -> Self
    where
        P: CompletionProvider + 'static,
    {
        let timeout = config.request_timeout();
        Self::new(config).with_strategy(PromptedExtractor::new(provider).with_timeout(timeout))
    }

    /// Prompted strategy first, then the pattern strategy filling gaps
    pub fn combined<P>(provider: P, config: ParserConfig) -> Self
    where
        P: CompletionProvider + 'static,
    {
        Self::prompted(provider, config).with_strategy(PatternExtractor::new())
    }

    /// Active configuration
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Names of the registered strategies, in run order
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run the full pipeline over `text`.
    ///
    /// The trace is cleared first. Only a missing event page or a bad
    /// configuration fails the run; every chunk-level problem is traced and
    /// the run carries on.
    pub async fn parse(&self, text: &str, trace: &mut TraceLog) -> Result<ParseOutcome, ExtractorError> {
        self.config.validate().map_err(ExtractorError::Config)?;
        if self.strategies.is_empty() {
            return Err(ExtractorError::Config("no extraction strategy registered".to_string()));
        }

        trace.clear();
        let run_id = RunId::new();
        trace.info(format!("Run {} started ({} chars)", run_id, text.chars().count()));
        info!("Starting parse run {}, text length {}", run_id, text.len());

        // 1. Classify pages
        let pages = PageClassifier::new()
            .with_context_limit(self.config.max_context_pages)
            .classify(text, trace);

        let event_pages = pages.iter().filter(|p| p.kind == PageKind::EventBearing).count();
        if event_pages == 0 {
            let error = ExtractorError::NoEventPages(pages.len());
            trace.error(error.to_string());
            return Err(error);
        }

        // 2. Summarize context
        let context = summarize_context(&context_text(&pages));
        if context.is_empty() {
            trace.warning("No meet context found");
        } else {
            trace.info(format!("Context summary: {} lines", context.lines().count()));
        }

        let events_text = event_text(&pages);
        trace.info(format!(
            "Event text: {} chars from {} pages",
            events_text.chars().count(),
            event_pages
        ));

        // 3. Extract and reconcile
        let mut reconciler = Reconciler::new(self.config.scoring);
        let mut meet_info: Option<MeetInfo> = None;
        let mut remote_calls = 0usize;

        for strategy in &self.strategies {
            let chunks = if strategy.is_remote() {
                Chunker::new(self.config.chunk_size, self.config.overlap_fraction).chunk(&events_text)
            } else {
                Chunker::whole(&events_text)
            };

            trace.info(format!(
                "Strategy '{}': {} chunks",
                strategy.name(),
                chunks.len()
            ));

            for chunk in &chunks {
                if strategy.is_remote() {
                    if remote_calls > 0 && !self.config.chunk_delay().is_zero() {
                        debug!("Waiting {:?} before next request", self.config.chunk_delay());
                        tokio::time::sleep(self.config.chunk_delay()).await;
                    }
                    remote_calls += 1;
                }

                trace.chunk_boundary(format!(
                    "{} chunk {}/{} (chars {}-{})",
                    strategy.name(),
                    chunk.number(),
                    chunk.total,
                    chunk.offset,
                    chunk.end_offset()
                ));

                let output = strategy.extract(chunk, &context, trace).await;

                if meet_info.is_none() {
                    if let Some(info) = output.meet_info.filter(|m| !m.is_empty()) {
                        trace_meet_info(&info, trace);
                        meet_info = Some(info);
                    }
                }

                if output.events.is_empty() {
                    debug!("{} chunk {} yielded no events", strategy.name(), chunk.number());
                    continue;
                }

                let source = format!("{} chunk {}", strategy.name(), chunk.number());
                reconciler.merge(output.events, &source, trace);
            }
        }

        let events = reconciler.into_events();
        if events.is_empty() {
            warn!("Run {} produced no events", run_id);
            trace.warning("No events extracted");
        }
        trace.success(format!("Parse complete: {} events", events.len()));
        info!("Parse run {} complete: {} events", run_id, events.len());

        Ok(ParseOutcome {
            run_id,
            meet_info: meet_info.unwrap_or_else(MeetInfo::unknown),
            events,
        })
    }
}

fn trace_meet_info(info: &MeetInfo, trace: &mut TraceLog) {
    trace.info(format!("Captured meet info: {}", info.display_name()));
    if let Some(limit) = &info.max_events_per_day {
        trace.info(format!("  Max events per day: {}", limit));
    }
    if let Some(limit) = &info.max_total_events {
        trace.info(format!("  Max total events: {}", limit));
    }
    if let Some(limit) = &info.max_sessions {
        trace.info(format!("  Max sessions: {}", limit));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetsheet_domain::TraceKind;
    use meetsheet_llm::MockProvider;
    use std::time::Duration;

    fn fast_config() -> ParserConfig {
        ParserConfig {
            chunk_delay_ms: 0,
            ..ParserConfig::default()
        }
    }

    #[tokio::test]
    async fn test_requires_strategy() {
        let parser = MeetParser::new(fast_config());
        let mut trace = TraceLog::new();

        let err = parser.parse("PAGE 1: 1-2 10 & Under 50 Free", &mut trace).await.unwrap_err();
        assert!(matches!(err, ExtractorError::Config(_)));
    }

    #[tokio::test]
    async fn test_invalid_config_is_fatal() {
        let config = ParserConfig {
            chunk_size: 0,
            ..ParserConfig::default()
        };
        let parser = MeetParser::pattern(config);
        let mut trace = TraceLog::new();

        let err = parser.parse("PAGE 1: text", &mut trace).await.unwrap_err();
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_trace_cleared_between_runs() {
        let parser = MeetParser::pattern(fast_config());
        let mut trace = TraceLog::new();
        trace.info("left over from an earlier run");

        parser
            .parse("PAGE 1:\n1-2 10 & Under 50 Free\n", &mut trace)
            .await
            .unwrap();

        assert!(trace.entries()[0].message.starts_with("Run "));
        assert!(!trace.entries().iter().any(|e| e.message.contains("left over")));
    }

    #[tokio::test]
    async fn test_chunk_boundaries_precede_chunks() {
        let provider = MockProvider::new(r#"{"events": []}"#);
        let config = ParserConfig {
            chunk_size: 40,
            ..fast_config()
        };
        let parser = MeetParser::prompted(provider.clone(), config);
        let mut trace = TraceLog::new();

        let text = "PAGE 1:\n1-2 10 & Under 50 Free\n3-4 11-12 100 Back\n5-6 13 & Over 200 IM\n";
        parser.parse(text, &mut trace).await.unwrap();

        assert!(provider.call_count() > 1);
        assert_eq!(trace.count(TraceKind::ChunkBoundary), provider.call_count());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_only_between_remote_calls() {
        let provider = MockProvider::new(r#"{"events": []}"#);
        let config = ParserConfig {
            chunk_size: 40,
            chunk_delay_ms: 1000,
            ..ParserConfig::default()
        };
        let parser = MeetParser::combined(provider.clone(), config);
        let mut trace = TraceLog::new();

        let text = "PAGE 1:\n1-2 10 & Under 50 Free\n3-4 11-12 100 Back\n5-6 13 & Over 200 IM\n";
        let started = tokio::time::Instant::now();
        let outcome = parser.parse(text, &mut trace).await.unwrap();
        let elapsed = started.elapsed();

        // No wait before the first request, none for the local pattern pass
        let calls = provider.call_count();
        assert!(calls > 1);
        assert_eq!(elapsed, Duration::from_millis(1000) * (calls as u32 - 1));
        assert_eq!(outcome.event_count(), 6);
    }

    #[test]
    fn test_strategy_names() {
        let parser = MeetParser::combined(MockProvider::default(), fast_config());
        assert_eq!(parser.strategy_names(), vec!["prompted", "pattern"]);
    }
}
