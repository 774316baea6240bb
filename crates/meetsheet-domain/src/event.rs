//! Event records - the fundamental unit of a meet schedule

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gender marker of an event.
///
/// Only three values are valid. Meet programs spell these many ways
/// ("Girls", "Women", "7"...); [`Gender::from_str`] accepts the common
/// spellings and rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Girls / women
    F,
    /// Boys / men
    M,
    /// Mixed or unspecified
    Mixed,
}

impl Gender {
    /// Canonical string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::F => "F",
            Gender::M => "M",
            Gender::Mixed => "Mixed",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "f" | "female" | "girls" | "girl" | "women" | "w" | "g" => Ok(Gender::F),
            "m" | "male" | "boys" | "boy" | "men" | "b" => Ok(Gender::M),
            "mixed" | "mix" | "x" | "coed" => Ok(Gender::Mixed),
            other => Err(format!("unknown gender marker '{}'", other)),
        }
    }
}

/// A single scheduled event.
///
/// Serialized with the camelCase field names of the export format.
/// `session` is kept exactly as printed: "AM"/"PM" and "Session 2" are both
/// valid and are never converted into one another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Event number printed in the program
    pub event_number: u32,

    /// Day-of-week label ("Friday")
    pub day: Option<String>,

    /// Session label ("AM", "PM", "Session 2")
    pub session: Option<String>,

    /// Free-text description ("10 & Under 100 IM")
    pub description: String,

    /// Age group label ("10 & Under", "11-12")
    pub age_group: Option<String>,

    /// Gender marker
    pub event_gender: Option<Gender>,

    /// First qualifying time
    pub time_standard_a: Option<String>,

    /// Second qualifying time
    pub time_standard_b: Option<String>,

    /// Free-text notes
    pub notes: Option<String>,

    /// Canonical stroke name, when a strategy classified it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
}

impl EventRecord {
    /// Create a record with only the number and description set
    pub fn new(event_number: u32, description: impl Into<String>) -> Self {
        Self {
            event_number,
            day: None,
            session: None,
            description: description.into(),
            age_group: None,
            event_gender: None,
            time_standard_a: None,
            time_standard_b: None,
            notes: None,
            stroke: None,
        }
    }

    /// Set the day label
    pub fn with_day(mut self, day: impl Into<String>) -> Self {
        self.day = Some(day.into());
        self
    }

    /// Set the session label
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    /// Set the age group
    pub fn with_age_group(mut self, age_group: impl Into<String>) -> Self {
        self.age_group = Some(age_group.into());
        self
    }

    /// Set the gender marker
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.event_gender = Some(gender);
        self
    }

    /// Number of populated key fields, used to arbitrate duplicates.
    ///
    /// Counts: description longer than 10 chars, age group, gender, day,
    /// session. Empty strings do not count.
    pub fn completeness_score(&self) -> usize {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());

        let mut score = 0;
        if self.description.chars().count() > 10 {
            score += 1;
        }
        if filled(&self.age_group) {
            score += 1;
        }
        if self.event_gender.is_some() {
            score += 1;
        }
        if filled(&self.day) {
            score += 1;
        }
        if filled(&self.session) {
            score += 1;
        }
        score
    }

    /// Length of the record's JSON serialization
    pub fn serialized_size(&self) -> usize {
        serde_json::to_string(self).map(|s| s.len()).unwrap_or(0)
    }
}
