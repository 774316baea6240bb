//! Merging of candidate records into one canonical list

use crate::config::ScoringPolicy;
use meetsheet_domain::{EventRecord, TraceLog};
use std::collections::BTreeMap;

/// What one merge call did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Numbers seen for the first time
    pub inserted: usize,
    /// Incumbents displaced by a more complete candidate
    pub replaced: usize,
    /// Candidates discarded in favour of the incumbent
    pub kept: usize,
}

/// Keeps the most complete record per event number
///
/// A candidate replaces the incumbent only when it scores strictly higher,
/// so among equals the first one seen wins.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    policy: ScoringPolicy,
    events: BTreeMap<u32, EventRecord>,
}

impl Reconciler {
    /// Create an empty reconciler
    pub fn new(policy: ScoringPolicy) -> Self {
        Self {
            policy,
            events: BTreeMap::new(),
        }
    }

    /// Score a record under the configured policy
    pub fn score(&self, record: &EventRecord) -> usize {
        match self.policy {
            ScoringPolicy::FieldCount => record.completeness_score(),
            ScoringPolicy::SerializedSize => record.serialized_size(),
        }
    }

    /// Merge one candidate list, tracing replacements and a summary
    pub fn merge(&mut self, candidates: Vec<EventRecord>, source: &str, trace: &mut TraceLog) -> MergeSummary {
        let mut summary = MergeSummary::default();

        for candidate in candidates {
            let number = candidate.event_number;
            let candidate_score = self.score(&candidate);

            let incumbent_score = match self.events.get(&number) {
                None => {
                    self.events.insert(number, candidate);
                    summary.inserted += 1;
                    continue;
                }
                Some(incumbent) => self.score(incumbent),
            };

            if candidate_score > incumbent_score {
                trace.info(format!(
                    "Event {}: replaced (score {} -> {})",
                    number, incumbent_score, candidate_score
                ));
                self.events.insert(number, candidate);
                summary.replaced += 1;
            } else {
                summary.kept += 1;
            }
        }

        trace.info(format!(
            "Merged {}: {} new, {} replaced, {} kept; {} events total",
            source,
            summary.inserted,
            summary.replaced,
            summary.kept,
            self.events.len()
        ));
        summary
    }

    /// Number of distinct events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when nothing was merged yet
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Canonical records, ascending by event number
    pub fn into_events(self) -> Vec<EventRecord> {
        self.events.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetsheet_domain::Gender;

    #[test]
    fn test_tie_keeps_first() {
        let mut reconciler = Reconciler::new(ScoringPolicy::FieldCount);
        let mut trace = TraceLog::new();

        let first = EventRecord::new(1, "A").with_day("Friday");
        let second = EventRecord::new(1, "A").with_session("AM");

        reconciler.merge(vec![first.clone()], "chunk 1", &mut trace);
        let summary = reconciler.merge(vec![second], "chunk 2", &mut trace);

        assert_eq!(summary.kept, 1);
        assert_eq!(reconciler.into_events(), vec![first]);
    }

    #[test]
    fn test_more_complete_wins() {
        let mut reconciler = Reconciler::new(ScoringPolicy::FieldCount);
        let mut trace = TraceLog::new();

        let short = EventRecord::new(5, "short");
        let complete = EventRecord::new(5, "a much longer and complete description")
            .with_age_group("10 & Under")
            .with_gender(Gender::F)
            .with_day("Friday")
            .with_session("AM");

        reconciler.merge(vec![short], "chunk 1", &mut trace);
        let summary = reconciler.merge(vec![complete.clone()], "chunk 2", &mut trace);

        assert_eq!(summary.replaced, 1);
        assert_eq!(reconciler.into_events(), vec![complete]);
        assert!(trace.entries().iter().any(|e| e.message.contains("Event 5: replaced")));
    }

    #[test]
    fn test_less_complete_does_not_replace() {
        let mut reconciler = Reconciler::new(ScoringPolicy::FieldCount);
        let mut trace = TraceLog::new();

        let complete = EventRecord::new(2, "11-12 200 Individual Medley").with_day("Saturday");
        reconciler.merge(vec![complete.clone()], "a", &mut trace);
        reconciler.merge(vec![EventRecord::new(2, "IM")], "b", &mut trace);

        assert_eq!(reconciler.into_events(), vec![complete]);
    }

    #[test]
    fn test_sorted_unique_output() {
        let mut reconciler = Reconciler::new(ScoringPolicy::FieldCount);
        let mut trace = TraceLog::new();

        reconciler.merge(
            vec![EventRecord::new(9, "x"), EventRecord::new(2, "y"), EventRecord::new(9, "z")],
            "chunk",
            &mut trace,
        );
        reconciler.merge(vec![EventRecord::new(4, "w")], "chunk", &mut trace);

        let numbers: Vec<u32> = reconciler.into_events().iter().map(|e| e.event_number).collect();
        assert_eq!(numbers, vec![2, 4, 9]);
    }

    #[test]
    fn test_serialized_size_policy() {
        let mut reconciler = Reconciler::new(ScoringPolicy::SerializedSize);
        let mut trace = TraceLog::new();

        // Equal field count, but the second serializes longer
        reconciler.merge(vec![EventRecord::new(3, "Free").with_day("Friday")], "a", &mut trace);
        let mut longer = EventRecord::new(3, "Free").with_day("Friday");
        longer.notes = Some("Girls event".to_string());
        reconciler.merge(vec![longer.clone()], "b", &mut trace);

        assert_eq!(reconciler.into_events(), vec![longer]);
    }

    #[test]
    fn test_empty() {
        let reconciler = Reconciler::new(ScoringPolicy::default());
        assert!(reconciler.is_empty());
        assert!(reconciler.into_events().is_empty());
    }
}
