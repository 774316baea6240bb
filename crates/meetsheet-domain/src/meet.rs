//! Meet-wide metadata

use serde::{Deserialize, Serialize};

/// Name shown when no strategy captured meet metadata
pub const UNKNOWN_MEET_NAME: &str = "Unknown Meet";

/// Top-level facts about a meet.
///
/// Capacity limits are kept as text ("5 per day", "3") since programs phrase
/// them inconsistently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetInfo {
    /// Meet name
    pub name: Option<String>,

    /// Meet date or date range
    pub date: Option<String>,

    /// Maximum events a swimmer may enter per day
    pub max_events_per_day: Option<String>,

    /// Maximum events a swimmer may enter for the whole meet
    pub max_total_events: Option<String>,

    /// Maximum sessions a swimmer may attend
    pub max_sessions: Option<String>,
}

impl MeetInfo {
    /// Placeholder reported when nothing was captured
    pub fn unknown() -> Self {
        Self {
            name: Some(UNKNOWN_MEET_NAME.to_string()),
            ..Default::default()
        }
    }

    /// True when no field carries a non-blank value
    pub fn is_empty(&self) -> bool {
        [
            &self.name,
            &self.date,
            &self.max_events_per_day,
            &self.max_total_events,
            &self.max_sessions,
        ]
        .iter()
        .all(|field| field.as_deref().map_or(true, |s| s.trim().is_empty()))
    }

    /// Display name, falling back to the placeholder
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(UNKNOWN_MEET_NAME)
    }
}
