//! Pre-flight document analysis
//!
//! Reports page statistics, detected event numbers, chunk-count estimates and
//! text-quality warnings without calling any extraction strategy.

use crate::chunking::{estimate_chunk_count, Chunker};
use crate::config::ChunkPreset;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;

/// Overlap fraction assumed by the chunk estimates
pub const ESTIMATE_OVERLAP: f64 = 0.10;

const PREVIEW_CHARS: usize = 100;
const SHORT_TEXT_CHARS: usize = 5000;
const SPECIAL_CHAR_RATIO: f64 = 0.20;
const LONG_WORD_AVERAGE: f64 = 15.0;

lazy_static! {
    static ref RE_PAGE_MARKER: Regex = Regex::new(r"PAGE\s+\d+\s*:").unwrap();
    static ref RE_EVENT_WORD: Regex = Regex::new(r"(?i)event\s+(\d+)").unwrap();
    static ref RE_GENDER_ROW: Regex = Regex::new(r"(?m)^(\d+)\s+[FM]").unwrap();
    static ref RE_AGE_ROW: Regex = Regex::new(r"(?m)^(\d+)\s+\d+&").unwrap();
}

/// Statistics for one page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageStats {
    /// 1-based page number
    pub page_number: usize,
    /// Characters on the page
    pub characters: usize,
    /// Lines on the page
    pub lines: usize,
    /// Occurrences of "event N"
    pub event_matches: usize,
    /// First characters, whitespace collapsed
    pub preview: String,
}

impl PageStats {
    /// Whether the page mentions any event number
    pub fn has_events(&self) -> bool {
        self.event_matches > 0
    }
}

/// A run of missing event numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EventGap {
    /// Last number before the gap
    pub after: u32,
    /// First number after the gap
    pub before: u32,
}

impl EventGap {
    /// Count of missing numbers
    pub fn size(&self) -> u32 {
        self.before - self.after - 1
    }
}

/// Chunk count for one preset
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChunkEstimate {
    /// Preset evaluated
    pub preset: ChunkPreset,
    /// Window size
    pub chunk_size: usize,
    /// Shared characters between neighbours
    pub overlap: usize,
    /// Advance between window starts
    pub step: usize,
    /// Windows needed for the whole text
    pub chunks: usize,
}

/// Full analysis report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentAnalysis {
    /// Characters in the input
    pub total_characters: usize,
    /// Per-page statistics
    pub pages: Vec<PageStats>,
    /// Detected event numbers, ascending
    pub event_numbers: Vec<u32>,
    /// Gaps between detected event numbers
    pub gaps: Vec<EventGap>,
    /// Estimates per preset, largest first
    pub chunk_estimates: Vec<ChunkEstimate>,
    /// Whitespace-separated words
    pub word_count: usize,
    /// Average word length
    pub average_word_length: f64,
    /// Share of characters outside printable ASCII and newline
    pub special_char_ratio: f64,
    /// Text-quality warnings
    pub issues: Vec<String>,
    /// Suggestions for chunking and follow-up checks
    pub recommendations: Vec<String>,
}

impl DocumentAnalysis {
    /// Lowest and highest detected event number
    pub fn event_range(&self) -> Option<(u32, u32)> {
        Some((*self.event_numbers.first()?, *self.event_numbers.last()?))
    }

    /// Pages mentioning at least one event number
    pub fn pages_with_events(&self) -> usize {
        self.pages.iter().filter(|p| p.has_events()).count()
    }

    /// Average characters per page, 0 without pages
    pub fn average_page_chars(&self) -> usize {
        if self.pages.is_empty() {
            return 0;
        }
        self.pages.iter().map(|p| p.characters).sum::<usize>() / self.pages.len()
    }

    /// True when no quality issue was found
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Estimate for a given preset
    pub fn estimate(&self, preset: ChunkPreset) -> Option<&ChunkEstimate> {
        self.chunk_estimates.iter().find(|e| e.preset == preset)
    }
}

/// Analyze page-marked document text
pub fn analyze(text: &str) -> DocumentAnalysis {
    let total_characters = text.chars().count();
    let pages = page_stats(text);
    let event_numbers = detect_event_numbers(text);
    let gaps = find_gaps(&event_numbers);
    let chunk_estimates = estimate_chunks(total_characters);

    let words: Vec<&str> = text.split_whitespace().collect();
    let word_count = words.len();
    let average_word_length = if word_count == 0 {
        0.0
    } else {
        words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / word_count as f64
    };

    let special = text
        .chars()
        .filter(|c| !(matches!(c, ' '..='~') || *c == '\n'))
        .count();
    let special_char_ratio = if total_characters == 0 {
        0.0
    } else {
        special as f64 / total_characters as f64
    };

    let mut issues = Vec::new();
    if total_characters < SHORT_TEXT_CHARS {
        issues.push("Very short text: document text extraction may have failed".to_string());
    }
    if special_char_ratio > SPECIAL_CHAR_RATIO {
        issues.push("High special character ratio: possible encoding problem".to_string());
    }
    if average_word_length > LONG_WORD_AVERAGE {
        issues.push("Very long average word length: words may have merged".to_string());
    }
    if !RE_PAGE_MARKER.is_match(text) {
        issues.push("No page markers found".to_string());
    }

    let mut analysis = DocumentAnalysis {
        total_characters,
        pages,
        event_numbers,
        gaps,
        chunk_estimates,
        word_count,
        average_word_length,
        special_char_ratio,
        issues,
        recommendations: Vec::new(),
    };
    analysis.recommendations = recommendations(&analysis);
    analysis
}

fn page_stats(text: &str) -> Vec<PageStats> {
    // Text before the first marker is not a page
    RE_PAGE_MARKER
        .split(text)
        .skip(1)
        .enumerate()
        .map(|(idx, raw)| {
            let page = raw.trim();
            PageStats {
                page_number: idx + 1,
                characters: page.chars().count(),
                lines: page.lines().count().max(1),
                event_matches: RE_EVENT_WORD.find_iter(page).count(),
                preview: page
                    .chars()
                    .take(PREVIEW_CHARS)
                    .collect::<String>()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" "),
            }
        })
        .collect()
}

/// Event numbers from "event N", line-start "N F|M" and line-start "N d&"
pub fn detect_event_numbers(text: &str) -> Vec<u32> {
    let mut numbers = BTreeSet::new();

    for pattern in [&*RE_EVENT_WORD, &*RE_GENDER_ROW, &*RE_AGE_ROW] {
        for caps in pattern.captures_iter(text) {
            if let Ok(n) = caps[1].parse::<u32>() {
                if n > 0 && n < 1000 {
                    numbers.insert(n);
                }
            }
        }
    }

    numbers.into_iter().collect()
}

/// Gaps between consecutive entries of a sorted list.
///
/// Descending or repeated neighbours are not gaps.
pub fn find_gaps(sorted: &[u32]) -> Vec<EventGap> {
    sorted
        .windows(2)
        .filter(|pair| pair[1].saturating_sub(pair[0]) > 1)
        .map(|pair| EventGap {
            after: pair[0],
            before: pair[1],
        })
        .collect()
}

fn estimate_chunks(total_characters: usize) -> Vec<ChunkEstimate> {
    ChunkPreset::ALL
        .iter()
        .map(|&preset| {
            let chunker = Chunker::new(preset.size(), ESTIMATE_OVERLAP);
            ChunkEstimate {
                preset,
                chunk_size: chunker.size(),
                overlap: chunker.overlap(),
                step: chunker.step(),
                chunks: estimate_chunk_count(total_characters, preset.size(), ESTIMATE_OVERLAP),
            }
        })
        .collect()
}

fn recommendations(analysis: &DocumentAnalysis) -> Vec<String> {
    let mut out = Vec::new();
    let total = analysis.event_numbers.len();

    if total > 100 {
        out.push("Use small (3000) or very-small (2000) chunks for best coverage".to_string());
    } else if total > 50 {
        out.push("Small (3000) chunks should work well".to_string());
    } else {
        out.push("Medium (5000) or large (8000) chunks are sufficient".to_string());
    }

    if analysis.gaps.len() > 5 {
        out.push("Many event number gaps: verify the numbering in the source document".to_string());
    }

    let event_pages = analysis.pages_with_events();
    if event_pages > 0 && total as f64 / event_pages as f64 > 20.0 {
        out.push("High event density: smaller chunks recommended".to_string());
    }

    if !analysis.is_clean() {
        out.push("Content quality issues detected: check the text extraction".to_string());
    }

    if let Some(estimate) = analysis.estimate(ChunkPreset::Small) {
        if estimate.chunks > 0 {
            out.push(format!(
                "Expected ~{:.1} events per chunk at {} chars",
                total as f64 / estimate.chunks as f64,
                estimate.chunk_size
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_event_numbers() {
        let text = "PAGE 1:\nEvent 1 Girls 50 Free\nEvent 2 Boys 50 Free\n12 F 100 Back\n15 10&Under 25 Fly\nEvent 1000 ignored";
        assert_eq!(detect_event_numbers(text), vec![1, 2, 12, 15]);
    }

    #[test]
    fn test_gaps() {
        let gaps = find_gaps(&[1, 2, 5, 6, 10]);
        assert_eq!(
            gaps,
            vec![EventGap { after: 2, before: 5 }, EventGap { after: 6, before: 10 }]
        );
        assert_eq!(gaps[0].size(), 2);
        assert_eq!(gaps[1].size(), 3);
        assert!(find_gaps(&[]).is_empty());
    }

    #[test]
    fn test_gaps_unsorted_input() {
        assert_eq!(find_gaps(&[9, 3, 5]), vec![EventGap { after: 3, before: 5 }]);
        assert!(find_gaps(&[4, 4, 2]).is_empty());
    }

    #[test]
    fn test_page_stats() {
        let text = "header\nPAGE 1:\nEvent 1\nEvent 2\nPAGE 2:\nWarm-ups at 7:00";
        let analysis = analyze(text);

        assert_eq!(analysis.pages.len(), 2);
        assert_eq!(analysis.pages[0].event_matches, 2);
        assert_eq!(analysis.pages[0].lines, 2);
        assert!(!analysis.pages[1].has_events());
        assert_eq!(analysis.pages_with_events(), 1);
        assert_eq!(analysis.pages[1].preview, "Warm-ups at 7:00");
    }

    #[test]
    fn test_chunk_estimates() {
        let text = "x".repeat(10_000);
        let analysis = analyze(&text);

        let very_small = analysis.estimate(ChunkPreset::VerySmall).unwrap();
        assert_eq!(very_small.overlap, 200);
        assert_eq!(very_small.step, 1800);
        // starts at 0, 1800, 3600, 5400, 7200, 9000
        assert_eq!(very_small.chunks, 6);
        assert_eq!(analysis.estimate(ChunkPreset::Large).unwrap().chunks, 2);
        assert_eq!(analysis.chunk_estimates.len(), 4);
    }

    #[test]
    fn test_quality_issues() {
        let analysis = analyze("short text without markers");
        assert!(analysis.issues.iter().any(|i| i.contains("Very short text")));
        assert!(analysis.issues.iter().any(|i| i.contains("No page markers")));
        assert!(!analysis.is_clean());

        let merged = format!("PAGE 1: {}", "a".repeat(6000));
        let analysis = analyze(&merged);
        assert!(analysis.issues.iter().any(|i| i.contains("long average word")));
    }

    #[test]
    fn test_special_characters() {
        let analysis = analyze("ÿÿÿÿ ab");
        assert!(analysis.special_char_ratio > 0.2);
        assert!(analysis.issues.iter().any(|i| i.contains("special character")));
    }

    #[test]
    fn test_recommendations() {
        let text = (1..=120)
            .map(|n| format!("Event {}", n * 2))
            .collect::<Vec<_>>()
            .join("\n");
        let analysis = analyze(&format!("PAGE 1:\n{}", text));

        assert_eq!(analysis.event_range(), Some((2, 240)));
        assert_eq!(analysis.gaps.len(), 119);
        assert!(analysis.recommendations[0].contains("very-small"));
        assert!(analysis.recommendations.iter().any(|r| r.contains("Many event number gaps")));
        assert!(analysis.recommendations.iter().any(|r| r.contains("High event density")));
    }

    #[test]
    fn test_empty_text() {
        let analysis = analyze("");
        assert!(analysis.pages.is_empty());
        assert!(analysis.event_range().is_none());
        assert_eq!(analysis.average_page_chars(), 0);
        assert_eq!(analysis.estimate(ChunkPreset::Medium).unwrap().chunks, 0);
    }
}
