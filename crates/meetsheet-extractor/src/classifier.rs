//! Page segmentation and classification

use lazy_static::lazy_static;
use meetsheet_domain::{PageKind, PageSegment, TraceLog};
use regex::Regex;
use tracing::debug;

lazy_static! {
    /// Page boundary marker: "PAGE 3:"
    static ref RE_PAGE_MARKER: Regex = Regex::new(r"PAGE\s+\d+\s*:").unwrap();

    /// "3", "Page 3", "Page 3 of 9", "- 3 -"
    static ref RE_PAGE_NUMBER_LINE: Regex =
        Regex::new(r"(?i)^\s*-?\s*(?:page\s+)?\d+(?:\s+of\s+\d+)?\s*-?\s*$").unwrap();

    /// Label with nothing after it: "Meet Name:", "Event Name"
    static ref RE_LABEL_LINE: Regex = Regex::new(r"(?i)^\s*(?:meet|event)\s+name\s*:?\s*$").unwrap();

    static ref RE_ENTRY_FORM: Regex = Regex::new(r"(?i)entry\s+form").unwrap();
    static ref RE_TEAM_NAME: Regex = Regex::new(r"(?i)team\s+name").unwrap();

    /// Explicit event marker: "EVENT #12"
    static ref RE_EVENT_MARKER: Regex = Regex::new(r"(?i)event\s*#").unwrap();

    /// Schedule row: a leading number (or number pair) and later an age token like "10 &"
    static ref RE_SCHEDULE_ROW: Regex =
        Regex::new(r#"(?m)^\s*"?\d{1,3}"?(?:\s*[-|,]\s*"?\d{1,3}"?)?[\s,|]+.*?\d+\s*&"#).unwrap();

    /// Meet-wide rules vocabulary
    static ref RE_CONTEXT_VOCAB: Regex = Regex::new(
        r"(?i)\bsessions?\b|\b(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b|swimmers?\s+may\s+enter|entry\s+limits?|limited\s+to\s+\d+|time\s+standards?|warm[\s-]?ups?|\bawards?\b"
    )
    .unwrap();
}

/// Splits page-marked text and labels each page
#[derive(Debug, Clone, Default)]
pub struct PageClassifier {
    max_context_pages: Option<usize>,
}

impl PageClassifier {
    /// Create a classifier with no context-page limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Only pages with an ordinal up to `limit` may become context pages
    pub fn with_context_limit(mut self, limit: Option<usize>) -> Self {
        self.max_context_pages = limit;
        self
    }

    /// Split `text` on page markers, clean each page and classify it.
    ///
    /// Every page is returned, including entry forms and unclassified
    /// pages; callers pick the kinds they need. Each decision is traced.
    pub fn classify(&self, text: &str, trace: &mut TraceLog) -> Vec<PageSegment> {
        let pages: Vec<&str> = RE_PAGE_MARKER
            .split(text)
            .filter(|page| !page.trim().is_empty())
            .collect();

        trace.info(format!("Classifying {} pages", pages.len()));

        pages
            .into_iter()
            .enumerate()
            .map(|(idx, raw)| {
                let ordinal = idx + 1;
                let cleaned = clean_page(raw);
                let mut kind = classify_text(&cleaned);

                if kind == PageKind::ContextBearing {
                    if let Some(limit) = self.max_context_pages {
                        if ordinal > limit {
                            trace.info(format!(
                                "Page {}: context vocabulary past the first {} pages, ignored",
                                ordinal, limit
                            ));
                            kind = PageKind::Unclassified;
                        }
                    }
                }

                match kind {
                    PageKind::EntryForm => trace.info(format!("Page {}: entry form, skipped", ordinal)),
                    PageKind::EventBearing => trace.info(format!("Page {}: event schedule", ordinal)),
                    PageKind::ContextBearing => trace.info(format!("Page {}: meet info", ordinal)),
                    PageKind::Unclassified => {
                        debug!("Page {} unclassified ({} chars)", ordinal, cleaned.chars().count());
                    }
                }

                PageSegment {
                    ordinal,
                    text: cleaned,
                    kind,
                }
            })
            .collect()
    }
}

/// Classify already-cleaned page text
pub fn classify_text(page: &str) -> PageKind {
    let has_context = RE_CONTEXT_VOCAB.is_match(page);

    if RE_ENTRY_FORM.is_match(page) && RE_TEAM_NAME.is_match(page) && !has_context {
        return PageKind::EntryForm;
    }
    if RE_EVENT_MARKER.is_match(page) || RE_SCHEDULE_ROW.is_match(page) {
        return PageKind::EventBearing;
    }
    if has_context {
        return PageKind::ContextBearing;
    }
    PageKind::Unclassified
}

/// Drop page-number lines, fragments under 3 characters and bare labels
pub fn clean_page(raw: &str) -> String {
    raw.lines()
        .filter(|line| {
            let trimmed = line.trim();
            trimmed.chars().count() >= 3
                && !RE_PAGE_NUMBER_LINE.is_match(trimmed)
                && !RE_LABEL_LINE.is_match(trimmed)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Event-bearing page text, joined in page order
pub fn event_text(pages: &[PageSegment]) -> String {
    join_kind(pages, PageKind::EventBearing)
}

/// Context-bearing page text, joined in page order
pub fn context_text(pages: &[PageSegment]) -> String {
    join_kind(pages, PageKind::ContextBearing)
}

fn join_kind(pages: &[PageSegment], kind: PageKind) -> String {
    pages
        .iter()
        .filter(|page| page.kind == kind)
        .map(|page| page.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
