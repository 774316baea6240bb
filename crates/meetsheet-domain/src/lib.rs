//! Meetsheet Domain Layer
//!
//! This crate contains the data model shared by every other Meetsheet crate:
//! the records produced by extraction, the ephemeral page/chunk values that
//! flow through the pipeline, the run trace, and the trait seams behind which
//! the completion service and the extraction strategies live.
//!
//! ## Key Concepts
//!
//! - **EventRecord**: One row of a meet schedule (number, day, session, description...)
//! - **MeetInfo**: Meet-wide metadata, captured at most once per run
//! - **PageSegment / Chunk**: Intermediate slices of the source document
//! - **TraceLog**: Caller-owned, append-only audit trail of a run
//!
//! ## Architecture
//!
//! - Pure data and trait definitions only
//! - No I/O; infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod completion;
pub mod event;
pub mod meet;
pub mod page;
pub mod run;
pub mod trace;
pub mod traits;

// Re-exports for convenience
pub use completion::{ChatMessage, ChatRole, CompletionRequest};
pub use event::{EventRecord, Gender};
pub use meet::MeetInfo;
pub use page::{Chunk, PageKind, PageSegment};
pub use run::RunId;
pub use trace::{TraceEntry, TraceKind, TraceLog};
pub use traits::{CompletionProvider, ExtractionOutput, ExtractionStrategy};
