//! Result types for a parse run

use crate::error::ExtractorError;
use meetsheet_domain::{EventRecord, Gender, MeetInfo, RunId};
use serde::Serialize;

/// Canonical result of one [`crate::MeetParser::parse`] run
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    /// Identifier of the run
    pub run_id: RunId,

    /// Meet metadata; [`MeetInfo::unknown`] when nothing was captured
    pub meet_info: MeetInfo,

    /// Deduplicated events, ascending by event number
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WrappedExport<'a> {
    meet_info: &'a MeetInfo,
    events: &'a [EventRecord],
}

impl ParseOutcome {
    /// Number of events
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Look up an event by number
    pub fn event(&self, event_number: u32) -> Option<&EventRecord> {
        self.events
            .binary_search_by_key(&event_number, |e| e.event_number)
            .ok()
            .map(|idx| &self.events[idx])
    }

    /// Count events per gender marker (F, M, Mixed, unspecified)
    pub fn gender_counts(&self) -> (usize, usize, usize, usize) {
        self.events.iter().fold((0, 0, 0, 0), |(f, m, x, none), e| match e.event_gender {
            Some(Gender::F) => (f + 1, m, x, none),
            Some(Gender::M) => (f, m + 1, x, none),
            Some(Gender::Mixed) => (f, m, x + 1, none),
            None => (f, m, x, none + 1),
        })
    }

    /// Pretty JSON export.
    ///
    /// Without wrapping this is the bare event array; with wrapping it is
    /// `{"meetInfo": ..., "events": [...]}`.
    pub fn to_json(&self, wrap_meet_info: bool) -> Result<String, ExtractorError> {
        let json = if wrap_meet_info {
            serde_json::to_string_pretty(&WrappedExport {
                meet_info: &self.meet_info,
                events: &self.events,
            })?
        } else {
            serde_json::to_string_pretty(&self.events)?
        };
        Ok(json)
    }
}
