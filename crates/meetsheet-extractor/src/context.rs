//! Meet-context summary built from context pages

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Lines longer than this are represented by an excerpt
const MAX_VERBATIM_LINE: usize = 240;

/// Characters kept from the start of a match when excerpting
const EXCERPT_CHARS: usize = 150;

lazy_static! {
    static ref RE_DAY_NAME: Regex =
        Regex::new(r"(?i)\b(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b").unwrap();

    static ref RE_CLOCK_TIME: Regex =
        Regex::new(r"(?i)\b\d{1,2}:\d{2}\b|\b\d{1,2}\s*(?:a\.?m\.?|p\.?m\.?)(?:\s|$|[^a-z])").unwrap();

    static ref RE_ENTRY_LIMIT: Regex = Regex::new(
        r"(?i)swimmers?\s+may\s+enter|entry\s+limits?|limited\s+to\s+\d+|\bmax(?:imum)?\b\.?[^\n]{0,60}?\bevents?\b"
    )
    .unwrap();

    static ref RE_TIME_STANDARD: Regex = Regex::new(r"(?i)time\s+standards?").unwrap();

    static ref RE_SESSION: Regex = Regex::new(r"(?i)\bsession\s+\d+").unwrap();

    static ref RE_AGE_RULE: Regex = Regex::new(
        r"(?i)\bage\s+(?:group|as\s+of|on\s+the|will\s+be|determined)|\bages?\s+up\b|\d+\s*&\s*(?:under|over)\b"
    )
    .unwrap();
}

/// Summarize context-page text into the lines that matter for extraction.
///
/// Groups, in order: day name with a clock time, entry limits, time
/// standards, `session N` mentions, age-group rules. Lines are kept verbatim
/// and appear at most once. Empty input gives an empty summary.
pub fn summarize_context(text: &str) -> String {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut seen: HashSet<String> = HashSet::new();
    let mut summary: Vec<String> = Vec::new();

    let mut collect = |pieces: Vec<String>| {
        for piece in pieces {
            if seen.insert(piece.clone()) {
                summary.push(piece);
            }
        }
    };

    collect(group(&lines, |line| {
        if RE_CLOCK_TIME.is_match(line) {
            RE_DAY_NAME.find(line).map(|m| m.start())
        } else {
            None
        }
    }));
    collect(group(&lines, |line| RE_ENTRY_LIMIT.find(line).map(|m| m.start())));
    collect(group(&lines, |line| RE_TIME_STANDARD.find(line).map(|m| m.start())));
    collect(group(&lines, |line| RE_SESSION.find(line).map(|m| m.start())));
    collect(group(&lines, |line| RE_AGE_RULE.find(line).map(|m| m.start())));

    summary.join("\n")
}

/// Lines selected by `matcher`, which returns the byte offset of the match.
/// Over-long lines are cut down to an excerpt starting at the match.
fn group<F>(lines: &[&str], matcher: F) -> Vec<String>
where
    F: Fn(&str) -> Option<usize>,
{
    lines
        .iter()
        .filter_map(|line| {
            let start = matcher(line)?;
            if line.chars().count() <= MAX_VERBATIM_LINE {
                Some(line.to_string())
            } else {
                Some(line[start..].chars().take(EXCERPT_CHARS).collect::<String>().trim().to_string())
            }
        })
        .collect()
}
