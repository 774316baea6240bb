//! Best-effort repair of JSON cut off mid-stream
//!
//! Completion services stop at their output ceiling without closing what
//! they opened. [`repair_truncated_json`] turns such output back into
//! something a JSON parser may accept. It is a pure function of its input.

/// Repair a truncated JSON document.
///
/// 1. If the text contains a `}`, everything after the last one is dropped.
/// 2. Otherwise a dangling string is closed when the unescaped quote count is odd.
/// 3. Open arrays and objects are closed in reverse nesting order.
///
/// The result is not guaranteed to parse; callers must still check it.
///
/// # Examples
///
/// ```
/// use meetsheet_extractor::repair_truncated_json;
///
/// let repaired = repair_truncated_json(r#"{"events":[{"eventNumber":1,"description":"Free"#);
/// assert_eq!(repaired, r#"{"events":[{"eventNumber":1,"description":"Free"}]}"#);
/// ```
pub fn repair_truncated_json(input: &str) -> String {
    let trimmed = input.trim();

    let mut repaired = match trimmed.rfind('}') {
        Some(pos) => trimmed[..=pos].to_string(),
        None => {
            let mut text = trimmed.to_string();
            if count_unescaped_quotes(&text) % 2 == 1 {
                text.push('"');
            }
            text
        }
    };

    let scan = scan_structure(&repaired);
    if scan.in_string {
        repaired.push('"');
    } else {
        strip_dangling_separator(&mut repaired);
    }

    for closer in scan.open.iter().rev() {
        repaired.push(*closer);
    }
    repaired
}

/// Number of `"` characters not preceded by an escaping backslash
pub fn count_unescaped_quotes(text: &str) -> usize {
    let mut count = 0;
    let mut escaped = false;
    for c in text.chars() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => count += 1,
            _ => {}
        }
    }
    count
}

struct Structure {
    /// Closers still owed, outermost first
    open: Vec<char>,
    in_string: bool,
}

fn scan_structure(text: &str) -> Structure {
    let mut open = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => open.push('}'),
            '[' => open.push(']'),
            '}' | ']' => {
                if open.last() == Some(&c) {
                    open.pop();
                }
            }
            _ => {}
        }
    }

    Structure { open, in_string }
}

/// Drop a trailing `,` and give a dangling `"key":` a null value
fn strip_dangling_separator(text: &mut String) {
    let kept = text.trim_end().trim_end_matches(',').trim_end().len();
    text.truncate(kept);
    if text.ends_with(':') {
        text.push_str("null");
    }
}
