//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and its
//! collaborators. Implementations live in other crates.

use crate::{Chunk, CompletionRequest, EventRecord, MeetInfo, TraceLog};
use async_trait::async_trait;

/// Trait for text-completion services
///
/// Implemented by the infrastructure layer (meetsheet-llm)
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Error type for completion calls
    type Error: std::fmt::Display + Send;

    /// Send a request and return the raw content of the first choice
    async fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error>;

    /// Name of the model serving the requests
    fn model_name(&self) -> &str;
}

/// Candidate records produced from one chunk
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionOutput {
    /// Meet metadata, if the chunk revealed any
    pub meet_info: Option<MeetInfo>,

    /// Candidate event records
    pub events: Vec<EventRecord>,
}

impl ExtractionOutput {
    /// Result carrying nothing; a valid outcome, not an error
    pub fn empty() -> Self {
        Self::default()
    }

    /// Result carrying only events
    pub fn with_events(events: Vec<EventRecord>) -> Self {
        Self {
            meet_info: None,
            events,
        }
    }

    /// True when neither events nor meet info were found
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.meet_info.as_ref().map_or(true, MeetInfo::is_empty)
    }
}

/// Trait for turning one chunk of event text into candidate records
///
/// Implemented by the application layer (meetsheet-extractor). An
/// implementation never fails the run: problems are written to the trace and
/// an empty output is returned.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    /// Short name used in the trace ("prompted", "pattern")
    fn name(&self) -> &str;

    /// Whether each call reaches an external service.
    ///
    /// Remote strategies get size-bounded chunks and a delay between calls;
    /// local ones receive the event text as a single chunk.
    fn is_remote(&self) -> bool {
        false
    }

    /// Extract candidates from one chunk, given the meet context summary
    async fn extract(&self, chunk: &Chunk, context: &str, trace: &mut TraceLog) -> ExtractionOutput;
}
