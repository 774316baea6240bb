//! Deterministic extraction for known row layouts
//!
//! Programs exported from the common meet-management tools print one row
//! per girls/boys event pair. Three row shapes are recognized:
//!
//! - quoted triple: `"101","10 & Under 50 Free","102"`
//! - piped triple: `39 | 10 & Under 100 IM | 40`
//! - hyphenated pair: `135-136 10 & Under 100 Free`
//!
//! Every row becomes two records: the left number is the girls event, the
//! right number the boys event. Day and session come from the nearest
//! preceding `<Day> AM|PM` or `Session N` header.

use crate::normalizer::normalize;
use crate::stroke::{extract_stroke, UNKNOWN_STROKE};
use async_trait::async_trait;
use lazy_static::lazy_static;
use meetsheet_domain::{
    Chunk, EventRecord, ExtractionOutput, ExtractionStrategy, Gender, MeetInfo, TraceLog,
};
use regex::{Captures, Regex};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

lazy_static! {
    static ref RE_QUOTED_NUMBER: Regex = Regex::new(r#""\d{1,3}"#).unwrap();

    static ref RE_QUOTED_ROW: Regex =
        Regex::new(r#""(\d{1,3})"\s*,\s*"([^"]+)"\s*,\s*"(\d{1,3})""#).unwrap();

    static ref RE_PIPED_ROW: Regex =
        Regex::new(r"(\d{1,3})\s*\|\s*([^|]+?)\s*\|\s*(\d{1,3})\b").unwrap();

    static ref RE_HYPHEN_PAIR: Regex = Regex::new(r"\d{1,3}\s*-\s*\d{1,3}").unwrap();

    /// Row marker of the hyphenated layout; the description follows
    static ref RE_HYPHEN_ROW: Regex = Regex::new(r"(\d{1,3})-(\d{1,3})\s+").unwrap();

    /// OCR variant: the hyphen became 2+ spaces. Applied to unnormalized text.
    static ref RE_FRAGMENTED_ROW: Regex =
        Regex::new(r"(?m)(\d{1,3})[ \t]{2,}(\d{1,3})[ \t]+([^\n]+)$").unwrap();

    /// "Saturday PM", "Session 2", "Friday Session 1"
    static ref RE_HEADER: Regex = Regex::new(
        r"(?i)\b(?P<day>monday|tuesday|wednesday|thursday|friday|saturday|sunday)\s+(?P<half>am|pm)\b|\b(?:(?P<sday>monday|tuesday|wednesday|thursday|friday|saturday|sunday)\s+)?(?P<session>session\s+\d+)\b"
    )
    .unwrap();

    static ref RE_AGE_GROUP: Regex = Regex::new(
        r"(?i)\b(?:\d{1,2}\s*&\s*(?:under|over|up)|\d{1,2}\s*-\s*\d{1,2}|\d{1,2}\s*&\s*\d{1,2}|open|senior|masters)\b"
    )
    .unwrap();

    static ref RE_MEET_NAME: Regex = Regex::new(
        r"\b(?:[A-Z0-9][A-Za-z0-9'&.]*\s+){0,5}(?:Invitational|Championships?|Classic|Swim Meet|Open Meet|Sprint Meet)\b"
    )
    .unwrap();

    static ref RE_DATE_RANGE: Regex = Regex::new(
        r"(?i)\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2}(?:st|nd|rd|th)?(?:\s*-\s*(?:(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+)?\d{1,2}(?:st|nd|rd|th)?)?\s*,?\s*\d{4}\b"
    )
    .unwrap();

    static ref RE_ENTRY_LIMIT: Regex = Regex::new(
        r"(?i)(?:limited\s+to|may\s+enter)\s+(?:a\s+max(?:imum)?\s+of\s+)?(\d+)\s+(?:individual\s+)?events?\s+per\s+(session|day|meet)"
    )
    .unwrap();
}

/// Row shape of an event schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLayout {
    /// `"101","desc","102"`
    QuotedTriple,
    /// `39 | desc | 40`
    PipedTriple,
    /// `135-136 desc`
    HyphenatedPair,
    /// None of the above
    Unknown,
}

impl fmt::Display for RowLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RowLayout::QuotedTriple => "quoted triple-column",
            RowLayout::PipedTriple => "piped triple-column",
            RowLayout::HyphenatedPair => "hyphenated pair",
            RowLayout::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Detect the row layout of normalized text
pub fn detect_layout(normalized: &str) -> RowLayout {
    if normalized.contains("\",\"") && RE_QUOTED_NUMBER.is_match(normalized) {
        RowLayout::QuotedTriple
    } else if RE_PIPED_ROW.is_match(normalized) {
        RowLayout::PipedTriple
    } else if RE_HYPHEN_PAIR.is_match(normalized) {
        RowLayout::HyphenatedPair
    } else {
        RowLayout::Unknown
    }
}

/// One schedule row: a girls/boys number pair sharing a description
#[derive(Debug, Clone, PartialEq)]
struct Row {
    girls: u32,
    boys: u32,
    description: String,
    position: usize,
}

/// Day/session in force from `start` onwards
#[derive(Debug, Clone)]
struct HeaderState {
    start: usize,
    day: Option<String>,
    session: Option<String>,
}

/// Strategy that extracts events with fixed row patterns
#[derive(Debug, Clone, Default)]
pub struct PatternExtractor;

impl PatternExtractor {
    /// Create a new pattern extractor
    pub fn new() -> Self {
        Self
    }

    /// Extract events and meet info from raw event text
    pub fn extract_text(&self, raw: &str, context: &str, trace: &mut TraceLog) -> ExtractionOutput {
        let normalized = normalize(raw);
        let layout = detect_layout(&normalized);

        let meet_info = extract_meet_info(&normalized, context, trace);

        if layout == RowLayout::Unknown {
            trace.warning("Pattern extraction: unknown row layout, no events extracted");
            return ExtractionOutput {
                meet_info,
                events: Vec::new(),
            };
        }
        trace.info(format!("Pattern extraction: {} layout", layout));

        let headers = header_states(&normalized);
        let rows = match layout {
            RowLayout::QuotedTriple => triple_rows(&RE_QUOTED_ROW, &normalized),
            RowLayout::PipedTriple => triple_rows(&RE_PIPED_ROW, &normalized),
            RowLayout::HyphenatedPair => hyphenated_rows(&normalized, &headers),
            RowLayout::Unknown => Vec::new(),
        };

        let mut events: Vec<EventRecord> = rows
            .iter()
            .flat_map(|row| expand_row(row, &headers))
            .collect();
        let mut row_count = rows.len();

        if layout == RowLayout::HyphenatedPair {
            let captured: HashSet<u32> = events.iter().map(|e| e.event_number).collect();
            let raw_headers = header_states(raw);
            let recovered = fragmented_rows(raw, &captured);
            if !recovered.is_empty() {
                trace.info(format!(
                    "Pattern extraction: recovered {} OCR-fragmented rows",
                    recovered.len()
                ));
            }
            row_count += recovered.len();
            events.extend(recovered.iter().flat_map(|row| expand_row(row, &raw_headers)));
        }

        events.sort_by_key(|e| e.event_number);
        trace.success(format!(
            "Pattern extraction: {} rows, {} events",
            row_count,
            events.len()
        ));

        ExtractionOutput { meet_info, events }
    }
}

#[async_trait]
impl ExtractionStrategy for PatternExtractor {
    fn name(&self) -> &str {
        "pattern"
    }

    async fn extract(&self, chunk: &Chunk, context: &str, trace: &mut TraceLog) -> ExtractionOutput {
        self.extract_text(&chunk.text, context, trace)
    }
}

/// Two sibling records for one row: girls (F) then boys (M)
fn expand_row(row: &Row, headers: &[HeaderState]) -> Vec<EventRecord> {
    let (day, session) = headers
        .iter()
        .rev()
        .find(|h| h.start <= row.position)
        .map(|h| (h.day.clone(), h.session.clone()))
        .unwrap_or((None, None));

    let age_group = RE_AGE_GROUP
        .find(&row.description)
        .map(|m| m.as_str().to_string());
    let stroke = Some(extract_stroke(&row.description)).filter(|s| s != UNKNOWN_STROKE);

    [(row.girls, Gender::F), (row.boys, Gender::M)]
        .into_iter()
        .filter(|(number, _)| *number > 0)
        .map(|(number, gender)| EventRecord {
            event_number: number,
            day: day.clone(),
            session: session.clone(),
            description: row.description.clone(),
            age_group: age_group.clone(),
            event_gender: Some(gender),
            time_standard_a: None,
            time_standard_b: None,
            notes: None,
            stroke: stroke.clone(),
        })
        .collect()
}

/// Cumulative header states in text order
fn header_states(text: &str) -> Vec<HeaderState> {
    let mut day: Option<String> = None;
    let mut session: Option<String> = None;

    RE_HEADER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if let (Some(d), Some(half)) = (caps.name("day"), caps.name("half")) {
                day = Some(title_case(d.as_str()));
                session = Some(half.as_str().to_uppercase());
            } else if let Some(s) = caps.name("session") {
                if let Some(d) = caps.name("sday") {
                    day = Some(title_case(d.as_str()));
                }
                session = Some(s.as_str().split_whitespace().collect::<Vec<_>>().join(" "));
            }
            Some(HeaderState {
                start: whole.start(),
                day: day.clone(),
                session: session.clone(),
            })
        })
        .collect()
}

fn title_case(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// True when the match at `start` is not glued to a preceding word or number
fn clean_left_edge(text: &str, start: usize) -> bool {
    match text[..start].chars().next_back() {
        None => true,
        Some(c) => !(c.is_alphanumeric() || matches!(c, ':' | '-' | '/' | '.')),
    }
}

/// Empty, or only gender words such as "Girls" or "Boys"
fn is_gender_prefix(text: &str) -> bool {
    text.split_whitespace().all(|word| word.parse::<Gender>().is_ok())
}

fn number(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group)?.as_str().parse().ok()
}

fn triple_rows(pattern: &Regex, text: &str) -> Vec<Row> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if !clean_left_edge(text, whole.start()) {
                return None;
            }
            Some(Row {
                girls: number(&caps, 1)?,
                boys: number(&caps, 3)?,
                description: caps.get(2)?.as_str().trim().to_string(),
                position: whole.start(),
            })
        })
        .collect()
}

/// Rows of the hyphenated layout.
///
/// A description runs until the next row marker or header. A marker with
/// nothing but gender words before it since the previous row
/// ("135-136 11-12 200 IM", "1-2 Girls 11-12 200 IM") is an age group
/// belonging to that row's description, not a new row.
fn hyphenated_rows(text: &str, headers: &[HeaderState]) -> Vec<Row> {
    struct Marker {
        start: usize,
        end: usize,
        girls: u32,
        boys: u32,
    }

    let mut markers: Vec<Marker> = Vec::new();
    for caps in RE_HYPHEN_ROW.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if !clean_left_edge(text, whole.start()) {
            continue;
        }
        let (Some(girls), Some(boys)) = (number(&caps, 1), number(&caps, 2)) else {
            continue;
        };

        if let Some(previous) = markers.last() {
            let between = &text[previous.end..whole.start()];
            let header_between = headers
                .iter()
                .any(|h| h.start >= previous.end && h.start < whole.start());
            if is_gender_prefix(between) && !header_between {
                debug!("Treating {}-{} as part of a description", girls, boys);
                continue;
            }
        }

        markers.push(Marker {
            start: whole.start(),
            end: whole.end(),
            girls,
            boys,
        });
    }

    markers
        .iter()
        .enumerate()
        .filter_map(|(idx, marker)| {
            let next_marker = markers.get(idx + 1).map_or(text.len(), |m| m.start);
            let next_header = headers
                .iter()
                .map(|h| h.start)
                .find(|start| *start >= marker.end)
                .unwrap_or(text.len());
            let stop = next_marker.min(next_header);

            let description = text[marker.end..stop].trim();
            if description.is_empty() {
                return None;
            }
            Some(Row {
                girls: marker.girls,
                boys: marker.boys,
                description: description.to_string(),
                position: marker.start,
            })
        })
        .collect()
}

/// Rows whose hyphen was lost to OCR ("7  8 11 & 12 200 Free"), skipping
/// any row that shares a number with an already captured event
fn fragmented_rows(raw: &str, captured: &HashSet<u32>) -> Vec<Row> {
    let mut seen = captured.clone();

    RE_FRAGMENTED_ROW
        .captures_iter(raw)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if !clean_left_edge(raw, whole.start()) {
                return None;
            }
            let girls = number(&caps, 1)?;
            let boys = number(&caps, 2)?;
            if seen.contains(&girls) || seen.contains(&boys) {
                debug!("Skipping fragmented row {}/{}: already captured", girls, boys);
                return None;
            }

            let tail = caps.get(3)?.as_str();
            let tail = match RE_HEADER.find(tail) {
                Some(header) => &tail[..header.start()],
                None => tail,
            };
            let description = normalize(tail);
            if description.is_empty() {
                return None;
            }

            seen.insert(girls);
            seen.insert(boys);
            Some(Row {
                girls,
                boys,
                description,
                position: whole.start(),
            })
        })
        .collect()
}

/// Meet name, date range and entry limit, searched in the event text and
/// then in the context summary
fn extract_meet_info(text: &str, context: &str, trace: &mut TraceLog) -> Option<MeetInfo> {
    let sources = [text, context];
    let mut info = MeetInfo::default();

    info.name = sources
        .iter()
        .find_map(|s| RE_MEET_NAME.find(s))
        .map(|m| m.as_str().trim().to_string());
    info.date = sources
        .iter()
        .find_map(|s| RE_DATE_RANGE.find(s))
        .map(|m| m.as_str().trim().to_string());

    if let Some(caps) = sources.iter().find_map(|s| RE_ENTRY_LIMIT.captures(s)) {
        let count = &caps[1];
        let period = caps[2].to_lowercase();
        let limit = format!("{} events per {}", count, period);
        match period.as_str() {
            "day" => info.max_events_per_day = Some(limit),
            "meet" => info.max_total_events = Some(limit),
            _ => trace.info(format!("Entry limit '{}' has no meet info field", limit)),
        }
    }

    (!info.is_empty()).then_some(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> (ExtractionOutput, TraceLog) {
        let mut trace = TraceLog::new();
        let output = PatternExtractor::new().extract_text(text, "", &mut trace);
        (output, trace)
    }

    #[test]
    fn test_detect_layout() {
        assert_eq!(detect_layout(r#""101","10 & Under 50 Free","102""#), RowLayout::QuotedTriple);
        assert_eq!(detect_layout("39 | 10 & Under 100 IM | 40"), RowLayout::PipedTriple);
        assert_eq!(detect_layout("135-136 10 & Under 100 Free"), RowLayout::HyphenatedPair);
        assert_eq!(detect_layout("Directions to the pool"), RowLayout::Unknown);
    }

    #[test]
    fn test_dual_column_expansion() {
        let (output, _) = run("39 | 10 & Under 100 IM | 40");

        assert_eq!(output.events.len(), 2);
        let girls = &output.events[0];
        let boys = &output.events[1];

        assert_eq!(girls.event_number, 39);
        assert_eq!(girls.event_gender, Some(Gender::F));
        assert_eq!(boys.event_number, 40);
        assert_eq!(boys.event_gender, Some(Gender::M));
        assert_eq!(girls.description, "10 & Under 100 IM");
        assert_eq!(girls.description, boys.description);
        assert_eq!(girls.age_group.as_deref(), Some("10 & Under"));
        assert_eq!(girls.stroke.as_deref(), Some("INDIVIDUAL MEDLEY"));
    }

    #[test]
    fn test_quoted_triple_rows() {
        let (output, _) = run(r#""101","10 & Under 50 Free","102" "103","11-12 100 Back","104""#);

        let numbers: Vec<u32> = output.events.iter().map(|e| e.event_number).collect();
        assert_eq!(numbers, vec![101, 102, 103, 104]);
        assert_eq!(output.events[2].description, "11-12 100 Back");
        assert_eq!(output.events[2].age_group.as_deref(), Some("11-12"));
        assert_eq!(output.events[3].stroke.as_deref(), Some("BACKSTROKE"));
    }

    #[test]
    fn test_hyphenated_rows_with_headers() {
        let text = "Friday PM\n1-2 10 & Under 50 Free\n3-4 11-12 100 Back\nSaturday AM\n5-6 13 & Over 200 Fly";
        let (output, _) = run(text);

        assert_eq!(output.events.len(), 6);
        let by_number = |n: u32| output.events.iter().find(|e| e.event_number == n).unwrap();

        assert_eq!(by_number(1).description, "10 & Under 50 Free");
        assert_eq!(by_number(1).day.as_deref(), Some("Friday"));
        assert_eq!(by_number(1).session.as_deref(), Some("PM"));

        assert_eq!(by_number(4).description, "11-12 100 Back");
        assert_eq!(by_number(4).age_group.as_deref(), Some("11-12"));

        assert_eq!(by_number(5).description, "13 & Over 200 Fly");
        assert_eq!(by_number(5).day.as_deref(), Some("Saturday"));
        assert_eq!(by_number(6).session.as_deref(), Some("AM"));
        assert_eq!(by_number(6).stroke.as_deref(), Some("BUTTERFLY"));
    }

    #[test]
    fn test_gender_word_before_age_range() {
        let (output, _) = run("1-2 Girls 11-12 200 IM\n3-4 Boys 13-14 100 Free");
        let numbers: Vec<u32> = output.events.iter().map(|e| e.event_number).collect();

        assert_eq!(numbers, vec![1, 2, 3, 4]);
        let first = output.events.iter().find(|e| e.event_number == 1).unwrap();
        assert_eq!(first.description, "Girls 11-12 200 IM");
        assert_eq!(first.age_group.as_deref(), Some("11-12"));
        assert_eq!(first.stroke.as_deref(), Some("INDIVIDUAL MEDLEY"));
    }

    #[test]
    fn test_session_header_kept_verbatim() {
        let (output, _) = run("Session 2\n7-8 8&9 25 Breast");

        assert_eq!(output.events[0].session.as_deref(), Some("Session 2"));
        assert!(output.events[0].day.is_none());
        assert_eq!(output.events[0].age_group.as_deref(), Some("8&9"));
    }

    #[test]
    fn test_split_digits_are_repaired_first() {
        let (output, _) = run("1 3 5 - 1 3 6 10 & Under 1 0 0 I M");
        let numbers: Vec<u32> = output.events.iter().map(|e| e.event_number).collect();

        assert_eq!(numbers, vec![135, 136]);
        assert_eq!(output.events[0].description, "10 & Under 100 IM");
    }

    #[test]
    fn test_fragmented_rows_recovered() {
        let text = "1-2 10 & Under 50 Free\n7   8 11 & 12 200 Freestyle\n1   2 duplicate row";
        let (output, trace) = run(text);

        let numbers: Vec<u32> = output.events.iter().map(|e| e.event_number).collect();
        assert_eq!(numbers, vec![1, 2, 7, 8]);
        let seven = output.events.iter().find(|e| e.event_number == 7).unwrap();
        assert_eq!(seven.description, "11 & 12 200 Freestyle");
        assert!(trace.entries().iter().any(|e| e.message.contains("OCR-fragmented")));
    }

    #[test]
    fn test_clock_times_are_not_rows() {
        let (output, _) = run("Warm-ups 1:00-2:00 PM 1-2 Open 400 Free Relay");
        let numbers: Vec<u32> = output.events.iter().map(|e| e.event_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(output.events[0].age_group.as_deref(), Some("Open"));
    }

    #[test]
    fn test_unknown_layout_is_empty_with_warning() {
        let (output, trace) = run("Directions to the pool");
        assert!(output.events.is_empty());
        assert_eq!(trace.count(meetsheet_domain::TraceKind::Warning), 1);
    }

    #[test]
    fn test_meet_info() {
        let text = "2025 Fall Sprint Classic November 14-16, 2025 Swimmers will be limited to 3 events per day 1-2 10 & Under 50 Free";
        let (output, _) = run(text);
        let info = output.meet_info.unwrap();

        assert_eq!(info.name.as_deref(), Some("2025 Fall Sprint Classic"));
        assert_eq!(info.date.as_deref(), Some("November 14-16, 2025"));
        assert_eq!(info.max_events_per_day.as_deref(), Some("3 events per day"));
        assert!(info.max_total_events.is_none());
    }

    #[test]
    fn test_meet_info_from_context() {
        let mut trace = TraceLog::new();
        let output = PatternExtractor::new().extract_text(
            "1-2 10 & Under 50 Free",
            "Swimmers may enter 6 events per meet",
            &mut trace,
        );
        let info = output.meet_info.unwrap();
        assert_eq!(info.max_total_events.as_deref(), Some("6 events per meet"));
    }

    #[tokio::test]
    async fn test_strategy_uses_chunk_text() {
        let chunk = Chunk {
            index: 0,
            total: 1,
            text: "39 | 10 & Under 100 IM | 40".to_string(),
            offset: 0,
        };
        let extractor = PatternExtractor::new();
        let mut trace = TraceLog::new();

        let output = extractor.extract(&chunk, "", &mut trace).await;

        assert_eq!(output.events.len(), 2);
        assert_eq!(extractor.name(), "pattern");
        assert!(!extractor.is_remote());
    }
}
