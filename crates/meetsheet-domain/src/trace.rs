//! Run trace - the append-only audit trail of one pipeline run
//!
//! The trace is owned by the caller and passed by `&mut` through every
//! stage. Each entry is also forwarded to `tracing` so it shows up in the
//! process log at a matching level.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error, info, warn};

/// Category of a trace entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraceKind {
    /// Progress information
    Info,
    /// A step completed successfully
    Success,
    /// Recoverable problem
    Warning,
    /// A failure; chunk-local unless the run aborted
    Error,
    /// Start of a new chunk
    ChunkBoundary,
    /// Raw content received from the completion service
    RawResponse,
}

impl fmt::Display for TraceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TraceKind::Info => "info",
            TraceKind::Success => "success",
            TraceKind::Warning => "warning",
            TraceKind::Error => "error",
            TraceKind::ChunkBoundary => "chunk-boundary",
            TraceKind::RawResponse => "raw-response",
        };
        f.write_str(label)
    }
}

/// A single timestamped trace message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// When the entry was appended
    pub timestamp: DateTime<Utc>,

    /// Human-readable message
    pub message: String,

    /// Category
    pub kind: TraceKind,
}

/// Append-only accumulator of trace entries
#[derive(Debug, Clone, Default)]
pub struct TraceLog {
    entries: Vec<TraceEntry>,
}

impl TraceLog {
    /// Create an empty trace
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn push(&mut self, kind: TraceKind, message: impl Into<String>) {
        let message = message.into();

        match kind {
            TraceKind::Error => error!("{}", message),
            TraceKind::Warning => warn!("{}", message),
            TraceKind::RawResponse => debug!("{}", message),
            _ => info!("{}", message),
        }

        self.entries.push(TraceEntry {
            timestamp: Utc::now(),
            message,
            kind,
        });
    }

    /// Append an info entry
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(TraceKind::Info, message);
    }

    /// Append a success entry
    pub fn success(&mut self, message: impl Into<String>) {
        self.push(TraceKind::Success, message);
    }

    /// Append a warning entry
    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(TraceKind::Warning, message);
    }

    /// Append an error entry
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(TraceKind::Error, message);
    }

    /// Mark the start of a chunk
    pub fn chunk_boundary(&mut self, message: impl Into<String>) {
        self.push(TraceKind::ChunkBoundary, message);
    }

    /// Record raw service output
    pub fn raw_response(&mut self, message: impl Into<String>) {
        self.push(TraceKind::RawResponse, message);
    }

    /// Drop all entries; called at the start of every run
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// All entries in append order
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Number of entries of the given kind
    pub fn count(&self, kind: TraceKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been logged
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the trace, returning its entries
    pub fn into_entries(self) -> Vec<TraceEntry> {
        self.entries
    }
}
