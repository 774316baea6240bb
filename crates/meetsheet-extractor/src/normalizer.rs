//! Repair of text whose line structure collapsed during extraction
//!
//! Text pulled out of a rendered document loses its line breaks and picks up
//! stray spaces inside numbers and abbreviations ("1 3 5 - 1 3 6", "I M").
//! [`normalize`] undoes the common damage with a fixed sequence of passes.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Runs of line breaks
    static ref RE_LINE_BREAKS: Regex = Regex::new(r"[\r\n]+").unwrap();

    /// Runs of 2+ whitespace characters
    static ref RE_MULTI_SPACE: Regex = Regex::new(r"\s{2,}").unwrap();

    /// Hyphenated event pair with every digit split: "1 3 5 - 1 3 6"
    static ref RE_SPLIT_PAIR: Regex =
        Regex::new(r"(\d)\s(\d)\s(\d)\s*-\s*(\d)\s(\d)\s(\d)").unwrap();

    /// Dotted abbreviation: "M . R ."
    static ref RE_DOTTED_ABBREV: Regex = Regex::new(r"([A-Z])\s*\.\s+([A-Z])\s*\.").unwrap();

    static ref RE_SPLIT_IM: Regex = Regex::new(r"\bI\s+M\b").unwrap();
    static ref RE_SPLIT_FR: Regex = Regex::new(r"\bF\s+R\b").unwrap();
    static ref RE_SPLIT_MR: Regex = Regex::new(r"\bM\s+R\b").unwrap();

    /// Split distance followed by a stroke or gender token: "1 0 0 IM".
    /// The token is captured so it can be written back unchanged.
    static ref RE_SPLIT_DISTANCE: Regex =
        Regex::new(r"(\d)\s+(\d)\s+(\d)(\s+(?:M\.R|MR|IM|FR|M|F))").unwrap();

    /// Spaces around a hyphen between two numbers
    static ref RE_SPACED_HYPHEN: Regex = Regex::new(r"(\d)\s*-\s*(\d)").unwrap();
}

/// Normalize raw document text.
///
/// Passes, in order:
/// 1. line breaks become spaces, whitespace runs collapse, ends are trimmed
/// 2. split hyphenated triplets are joined (`1 3 5 - 1 3 6` → `135-136`)
/// 3. dotted and split abbreviations are collapsed (`M . R .` → `MR`, `I M` → `IM`)
/// 4. split distances before a stroke/gender token are joined (`1 0 0 IM` → `100 IM`)
/// 5. spaces around a hyphen joining two numbers are removed
///
/// The sequence is repeated until the text stops changing, so the result is
/// a fixed point: `normalize(&normalize(x)) == normalize(x)`.
///
/// # Examples
///
/// ```
/// use meetsheet_extractor::normalize;
///
/// assert_eq!(normalize("1 3 5 - 1 3 6\n10 & Under 1 0 0 I M"), "135-136 10 & Under 100 IM");
/// ```
pub fn normalize(raw: &str) -> String {
    let mut current = normalize_once(raw);
    // After the first round every pass only deletes characters, so each
    // changing round shortens the text and the loop terminates.
    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_once(text: &str) -> String {
    // Pass 1
    let text = RE_LINE_BREAKS.replace_all(text, " ");
    let text = RE_MULTI_SPACE.replace_all(&text, " ");
    let text = text.trim();

    // Pass 2
    let text = RE_SPLIT_PAIR.replace_all(text, "${1}${2}${3}-${4}${5}${6}");

    // Pass 3
    let text = RE_DOTTED_ABBREV.replace_all(&text, "${1}${2}");
    let text = RE_SPLIT_IM.replace_all(&text, "IM");
    let text = RE_SPLIT_FR.replace_all(&text, "FR");
    let text = RE_SPLIT_MR.replace_all(&text, "MR");

    // Pass 4
    let text = RE_SPLIT_DISTANCE.replace_all(&text, "${1}${2}${3}${4}");

    // Pass 5
    let text = RE_SPACED_HYPHEN.replace_all(&text, "${1}-${2}");

    text.trim().to_string()
}
