//! Ephemeral document slices: classified pages and extraction chunks

use std::fmt;

/// Classification of one page of the source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// Contains schedule rows
    EventBearing,
    /// Carries meet-wide rules or metadata
    ContextBearing,
    /// A blank entry form; always discarded
    EntryForm,
    /// Nothing recognizable; dropped
    Unclassified,
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PageKind::EventBearing => "event",
            PageKind::ContextBearing => "context",
            PageKind::EntryForm => "entry-form",
            PageKind::Unclassified => "unclassified",
        };
        f.write_str(label)
    }
}

/// One page of the source document after cleanup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSegment {
    /// 1-based page ordinal
    pub ordinal: usize,

    /// Cleaned page text
    pub text: String,

    /// Classification tag
    pub kind: PageKind,
}

/// A bounded window of event text handed to an extraction strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 0-based position in the chunk sequence
    pub index: usize,

    /// Total number of chunks in the sequence
    pub total: usize,

    /// Window text
    pub text: String,

    /// Character offset of the window start in the source text
    pub offset: usize,
}

impl Chunk {
    /// 1-based chunk number, as shown to humans and in prompts
    pub fn number(&self) -> usize {
        self.index + 1
    }

    /// Character offset one past the window end
    pub fn end_offset(&self) -> usize {
        self.offset + self.text.chars().count()
    }
}
