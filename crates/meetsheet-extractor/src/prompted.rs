//! Extraction through an external completion service

use crate::error::ExtractorError;
use crate::parser::{parse_payload, strip_code_fence, ParsedPayload};
use crate::prompt::{PromptBuilder, DEFAULT_MAX_TOKENS};
use crate::repair::repair_truncated_json;
use async_trait::async_trait;
use meetsheet_domain::{Chunk, CompletionProvider, ExtractionOutput, ExtractionStrategy, TraceLog};
use std::time::Duration;
use tracing::{debug, info};

/// Characters of a bad payload quoted in the trace
const EXCERPT_CHARS: usize = 500;

/// Strategy that asks a completion service to extract events
///
/// Failures never escape: provider errors, timeouts and unusable payloads
/// are traced and the chunk contributes nothing.
pub struct PromptedExtractor<P: CompletionProvider> {
    provider: P,
    timeout: Duration,
    max_tokens: u32,
}

impl<P: CompletionProvider> PromptedExtractor<P> {
    /// Create an extractor with a 120 second request timeout
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            timeout: Duration::from_secs(120),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Bound each completion call
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the output token ceiling
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// The wrapped provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    async fn request(&self, chunk: &Chunk, context: &str) -> Result<String, ExtractorError> {
        let request = PromptBuilder::new(chunk, context)
            .with_max_tokens(self.max_tokens)
            .build();

        debug!(
            "Sending chunk {}/{} to {} ({} prompt chars)",
            chunk.number(),
            chunk.total,
            self.provider.model_name(),
            request.prompt_chars()
        );

        match tokio::time::timeout(self.timeout, self.provider.complete(&request)).await {
            Ok(Ok(content)) => Ok(content),
            Ok(Err(e)) => Err(ExtractorError::Network(e.to_string())),
            Err(_) => Err(ExtractorError::Timeout(self.timeout.as_secs())),
        }
    }
}

#[async_trait]
impl<P: CompletionProvider> ExtractionStrategy for PromptedExtractor<P> {
    fn name(&self) -> &str {
        "prompted"
    }

    fn is_remote(&self) -> bool {
        true
    }

    async fn extract(&self, chunk: &Chunk, context: &str, trace: &mut TraceLog) -> ExtractionOutput {
        let raw = match self.request(chunk, context).await {
            Ok(raw) => raw,
            Err(e) => {
                trace.error(format!("Chunk {}: {}", chunk.number(), e));
                return ExtractionOutput::empty();
            }
        };

        trace.raw_response(format!(
            "Chunk {}: received {} chars",
            chunk.number(),
            raw.chars().count()
        ));

        let output = interpret_response(&raw, chunk.number(), trace);
        info!(
            "Chunk {}/{}: {} events from completion",
            chunk.number(),
            chunk.total,
            output.events.len()
        );
        output
    }
}

/// Turn raw completion content into candidates, repairing once if needed
pub fn interpret_response(raw: &str, chunk_number: usize, trace: &mut TraceLog) -> ExtractionOutput {
    let content = strip_code_fence(raw);

    let payload = match parse_payload(content) {
        Ok(payload) => payload,
        Err(first) => match reparse(content, chunk_number, &first, trace) {
            Some(payload) => payload,
            None => return ExtractionOutput::empty(),
        },
    };

    for issue in &payload.issues {
        trace.warning(format!("Chunk {}: {}", chunk_number, issue));
    }
    trace.success(format!(
        "Chunk {}: parsed {} events",
        chunk_number,
        payload.events.len()
    ));

    ExtractionOutput {
        meet_info: payload.meet_info,
        events: payload.events,
    }
}

fn reparse(
    content: &str,
    chunk_number: usize,
    first: &ExtractorError,
    trace: &mut TraceLog,
) -> Option<ParsedPayload> {
    trace.warning(format!(
        "Chunk {}: {}; attempting truncation repair",
        chunk_number, first
    ));

    let repaired = repair_truncated_json(content);
    match parse_payload(&repaired) {
        Ok(payload) => {
            trace.success(format!(
                "Chunk {}: repaired payload ({} -> {} chars)",
                chunk_number,
                content.chars().count(),
                repaired.chars().count()
            ));
            Some(payload)
        }
        Err(e) => {
            let error = ExtractorError::MalformedPayload(format!(
                "{} ({} chars, starts: {})",
                e,
                content.chars().count(),
                excerpt(content)
            ));
            trace.error(format!("Chunk {}: {}", chunk_number, error));
            None
        }
    }
}

fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetsheet_domain::{Gender, TraceKind};
    use meetsheet_llm::MockProvider;

    fn chunk(text: &str) -> Chunk {
        Chunk {
            index: 0,
            total: 1,
            text: text.to_string(),
            offset: 0,
        }
    }

    #[tokio::test]
    async fn test_extracts_events() {
        let provider = MockProvider::new(
            r#"{"meetInfo": {"name": "Fall Classic"}, "events": [
                {"eventNumber": 39, "description": "10 & Under 100 IM", "eventGender": "F"},
                {"eventNumber": 40, "description": "10 & Under 100 IM", "eventGender": "M"}
            ]}"#,
        );
        let extractor = PromptedExtractor::new(provider.clone());
        let mut trace = TraceLog::new();

        let output = extractor.extract(&chunk("39 | 10 & Under 100 IM | 40"), "", &mut trace).await;

        assert_eq!(output.events.len(), 2);
        assert_eq!(output.events[0].event_gender, Some(Gender::F));
        assert_eq!(output.meet_info.unwrap().name.as_deref(), Some("Fall Classic"));
        assert_eq!(trace.count(TraceKind::RawResponse), 1);
        assert_eq!(provider.call_count(), 1);
        assert!(provider.requests()[0].messages[1].content.contains("39 | 10 & Under 100 IM | 40"));
    }

    #[tokio::test]
    async fn test_provider_error_yields_empty() {
        let provider = MockProvider::default();
        provider.push_error("HTTP 503");
        let extractor = PromptedExtractor::new(provider);
        let mut trace = TraceLog::new();

        let output = extractor.extract(&chunk("text"), "", &mut trace).await;

        assert!(output.is_empty());
        assert_eq!(trace.count(TraceKind::Error), 1);
        assert!(trace.entries()[0].message.contains("Network error"));
    }

    #[tokio::test]
    async fn test_truncated_response_is_repaired() {
        let provider = MockProvider::new(r#"{"events":[{"eventNumber":1,"description":"Free"#);
        let extractor = PromptedExtractor::new(provider);
        let mut trace = TraceLog::new();

        let output = extractor.extract(&chunk("text"), "", &mut trace).await;

        assert_eq!(output.events.len(), 1);
        assert_eq!(output.events[0].description, "Free");
        assert!(trace.entries().iter().any(|e| e.message.contains("repaired payload")));
    }

    #[tokio::test]
    async fn test_garbage_response_is_malformed() {
        let provider = MockProvider::new("I could not find any events, sorry!");
        let extractor = PromptedExtractor::new(provider);
        let mut trace = TraceLog::new();

        let output = extractor.extract(&chunk("text"), "", &mut trace).await;

        assert!(output.events.is_empty());
        let last = trace.entries().last().unwrap();
        assert_eq!(last.kind, TraceKind::Error);
        assert!(last.message.contains("Malformed payload"));
        assert!(last.message.contains("I could not find any events"));
    }

    #[tokio::test]
    async fn test_fenced_response() {
        let provider = MockProvider::new("```json\n{\"events\": [{\"eventNumber\": 3, \"description\": \"x\"}]}\n```");
        let extractor = PromptedExtractor::new(provider);
        let mut trace = TraceLog::new();

        let output = extractor.extract(&chunk("text"), "", &mut trace).await;
        assert_eq!(output.events.len(), 1);
    }

    #[tokio::test]
    async fn test_schema_error_keeps_meet_info() {
        let provider = MockProvider::new(r#"{"meetInfo": {"name": "Invitational"}}"#);
        let extractor = PromptedExtractor::new(provider);
        let mut trace = TraceLog::new();

        let output = extractor.extract(&chunk("text"), "", &mut trace).await;

        assert!(output.events.is_empty());
        assert!(output.meet_info.is_some());
        assert!(trace.entries().iter().any(|e| e.kind == TraceKind::Warning && e.message.contains("Schema")));
    }

    #[tokio::test]
    async fn test_timeout() {
        struct SlowProvider;

        #[async_trait]
        impl CompletionProvider for SlowProvider {
            type Error = String;

            async fn complete(&self, _request: &meetsheet_domain::CompletionRequest) -> Result<String, String> {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok("{}".to_string())
            }

            fn model_name(&self) -> &str {
                "slow"
            }
        }

        let extractor = PromptedExtractor::new(SlowProvider).with_timeout(Duration::from_millis(20));
        let mut trace = TraceLog::new();

        let output = extractor.extract(&chunk("text"), "", &mut trace).await;

        assert!(output.is_empty());
        assert!(trace.entries()[0].message.contains("timeout"));
    }

    #[test]
    fn test_strategy_identity() {
        let extractor = PromptedExtractor::new(MockProvider::default());
        assert_eq!(extractor.name(), "prompted");
        assert!(extractor.is_remote());
    }
}
