//! Stroke classification for event descriptions

/// Canonical stroke names keyed by punctuation- and space-free spellings.
///
/// Order matters for substring fallback: earlier keys win.
pub const STROKE_TABLE: &[(&str, &str)] = &[
    ("FREE", "FREESTYLE"),
    ("FREESTYLE", "FREESTYLE"),
    ("FR", "FREESTYLE"),
    ("FRE", "FREESTYLE"),
    ("BACK", "BACKSTROKE"),
    ("BACKSTROKE", "BACKSTROKE"),
    ("BK", "BACKSTROKE"),
    ("BREAST", "BREASTSTROKE"),
    ("BREASTSTROKE", "BREASTSTROKE"),
    ("BR", "BREASTSTROKE"),
    ("BRST", "BREASTSTROKE"),
    ("FLY", "BUTTERFLY"),
    ("BUTTERFLY", "BUTTERFLY"),
    ("FL", "BUTTERFLY"),
    ("IM", "INDIVIDUAL MEDLEY"),
    ("INDIVIDUALMEDLEY", "INDIVIDUAL MEDLEY"),
    ("INDMEDLEY", "INDIVIDUAL MEDLEY"),
    ("MR", "MEDLEY RELAY"),
    ("MEDLEYRELAY", "MEDLEY RELAY"),
    ("MEDLEYRLY", "MEDLEY RELAY"),
    ("MRELAY", "MEDLEY RELAY"),
    ("RELAY", "FREESTYLE RELAY"),
    ("FRRELAY", "FREESTYLE RELAY"),
    ("FREERELAY", "FREESTYLE RELAY"),
    ("FREESTYLERELAY", "FREESTYLE RELAY"),
    ("RLY", "FREESTYLE RELAY"),
    ("FRLY", "FREESTYLE RELAY"),
    ("MIXEDRELAY", "MIXED RELAY"),
    ("MIXRELAY", "MIXED RELAY"),
    ("SPRINT", "SPRINT FREESTYLE"),
    ("DISTANCE", "DISTANCE FREESTYLE"),
    ("OPEN", "OPEN WATER"),
    ("KICK", "KICK"),
    ("PULL", "PULL"),
    ("DIVE", "DIVING"),
];

/// Words that mark where the stroke part of a description starts
const STROKE_KEYWORDS: &[&str] = &[
    "FREESTYLE", "FREE", "FR", "BACKSTROKE", "BACK", "BK", "BREASTSTROKE", "BREAST", "BR",
    "BUTTERFLY", "FLY", "FL", "IM", "MEDLEY", "RELAY", "RLY", "MR", "MIXED",
];

/// Returned when nothing can be classified
pub const UNKNOWN_STROKE: &str = "UNKNOWN";

/// Map a raw stroke spelling to its canonical name.
///
/// Exact key match on the uppercased text with spaces and punctuation
/// removed, then substring containment either way, then the raw text
/// uppercased.
///
/// # Examples
///
/// ```
/// use meetsheet_extractor::normalize_stroke;
///
/// assert_eq!(normalize_stroke("Free"), "FREESTYLE");
/// assert_eq!(normalize_stroke("Medley Relay"), "MEDLEY RELAY");
/// assert_eq!(normalize_stroke("I.M."), "INDIVIDUAL MEDLEY");
/// ```
pub fn normalize_stroke(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .to_uppercase()
        .chars()
        .filter(|c| !(c.is_whitespace() || matches!(c, '.' | '&' | ',' | '-')))
        .collect();

    if cleaned.is_empty() {
        return UNKNOWN_STROKE.to_string();
    }

    if let Some((_, canonical)) = STROKE_TABLE.iter().find(|(key, _)| *key == cleaned) {
        return canonical.to_string();
    }

    STROKE_TABLE
        .iter()
        .find(|(key, _)| cleaned.contains(key) || key.contains(cleaned.as_str()))
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| raw.trim().to_uppercase())
}

/// Find the stroke in an event description.
///
/// Words are scanned right to left for one resembling a stroke or relay
/// keyword. That word, together with any keyword words directly before it
/// ("Medley Relay"), is normalized. Without a keyword the last word is
/// normalized instead.
pub fn extract_stroke(description: &str) -> String {
    let words: Vec<&str> = description.split_whitespace().collect();
    let Some(last) = words.last() else {
        return UNKNOWN_STROKE.to_string();
    };

    let Some(end) = (0..words.len()).rev().find(|&i| is_stroke_word(words[i])) else {
        return normalize_stroke(last);
    };

    let mut start = end;
    while start > 0 && is_stroke_word(words[start - 1]) {
        start -= 1;
    }
    normalize_stroke(&words[start..].join(" "))
}

fn is_stroke_word(raw: &str) -> bool {
    let word: String = raw
        .to_uppercase()
        .chars()
        .filter(|c| !matches!(c, '.' | ',' | ';' | ':'))
        .collect();
    if word.is_empty() {
        return false;
    }

    STROKE_KEYWORDS.iter().any(|keyword| {
        word.contains(keyword) || (word.chars().count() >= 2 && keyword.contains(word.as_str()))
    })
}
