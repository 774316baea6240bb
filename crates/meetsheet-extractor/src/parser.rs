//! Parse completion output into typed records

use crate::error::ExtractorError;
use meetsheet_domain::{EventRecord, Gender, MeetInfo};
use serde_json::{Map, Value};
use tracing::warn;

/// A payload that parsed, possibly with parts rejected
#[derive(Debug, Default)]
pub struct ParsedPayload {
    /// Meet metadata, when present and non-empty
    pub meet_info: Option<MeetInfo>,

    /// Events that passed validation
    pub events: Vec<EventRecord>,

    /// Schema problems that did not prevent using the rest
    pub issues: Vec<ExtractorError>,
}

/// Strip an optional markdown code fence around the payload
pub fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    // Drop the opening fence line ("```" or "```json")
    let body = match trimmed.find('\n') {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed.trim_start_matches('`').trim_start_matches("json"),
    };
    // The closing fence is missing when output was cut off
    body.trim_end().trim_end_matches("```").trim()
}

/// Parse `{ "meetInfo"?: {...}, "events": [...] }`.
///
/// Fails only when the text is not JSON or not an object. A missing
/// `events` array and individual invalid events are reported in
/// [`ParsedPayload::issues`]; everything valid is kept.
pub fn parse_payload(text: &str) -> Result<ParsedPayload, ExtractorError> {
    let json: Value = serde_json::from_str(text)?;
    let obj = json
        .as_object()
        .ok_or_else(|| ExtractorError::Schema("Expected a JSON object".to_string()))?;

    let mut payload = ParsedPayload::default();

    match obj.get("meetInfo") {
        None | Some(Value::Null) => {}
        Some(Value::Object(info)) => {
            let meet_info = parse_meet_info(info);
            if !meet_info.is_empty() {
                payload.meet_info = Some(meet_info);
            }
        }
        Some(_) => payload
            .issues
            .push(ExtractorError::Schema("meetInfo is not an object".to_string())),
    }

    let events = match obj.get("events").and_then(Value::as_array) {
        Some(events) => events,
        None => {
            payload
                .issues
                .push(ExtractorError::Schema("Missing events array".to_string()));
            return Ok(payload);
        }
    };

    for (idx, event_json) in events.iter().enumerate() {
        match parse_event_json(event_json) {
            Ok(event) => payload.events.push(event),
            Err(e) => {
                warn!("Event {} failed validation: {}", idx, e);
                payload
                    .issues
                    .push(ExtractorError::Schema(format!("event {}: {}", idx, e)));
            }
        }
    }

    Ok(payload)
}

/// Parse a single event from JSON
fn parse_event_json(json: &Value) -> Result<EventRecord, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "Event is not a JSON object".to_string())?;

    let event_number = obj
        .get("eventNumber")
        .and_then(event_number)
        .ok_or_else(|| "Missing or invalid 'eventNumber'".to_string())?;

    let event_gender = match text_field(obj, "eventGender") {
        Some(marker) => Some(
            marker
                .parse::<Gender>()
                .map_err(|_| format!("Unknown gender marker '{}'", marker))?,
        ),
        None => None,
    };

    Ok(EventRecord {
        event_number,
        day: text_field(obj, "day"),
        session: text_field(obj, "session"),
        description: text_field(obj, "description").unwrap_or_default(),
        age_group: text_field(obj, "ageGroup"),
        event_gender,
        time_standard_a: text_field(obj, "timeStandardA"),
        time_standard_b: text_field(obj, "timeStandardB"),
        notes: text_field(obj, "notes"),
        stroke: text_field(obj, "stroke"),
    })
}

fn parse_meet_info(obj: &Map<String, Value>) -> MeetInfo {
    MeetInfo {
        name: text_field(obj, "name"),
        date: text_field(obj, "date"),
        max_events_per_day: text_field(obj, "maxEventsPerDay"),
        max_total_events: text_field(obj, "maxTotalEvents"),
        max_sessions: text_field(obj, "maxSessions"),
    }
}

/// Positive event number, as a JSON number or a numeric string ("12", "#12")
fn event_number(value: &Value) -> Option<u32> {
    let number = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().trim_start_matches('#').trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(number).ok().filter(|n| *n > 0)
}

/// Non-blank string field; numbers and booleans are stringified
fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_payload() {
        let payload = parse_payload(
            r#"{
                "meetInfo": {"name": "Fall Classic", "date": "2025-11-15", "maxSessions": 3},
                "events": [
                    {"eventNumber": 1, "day": "Friday", "session": "AM",
                     "description": "8 & Under 25 Free", "ageGroup": "8 & Under",
                     "eventGender": "F", "timeStandardA": null, "notes": "Girls event"}
                ]
            }"#,
        )
        .unwrap();

        let info = payload.meet_info.unwrap();
        assert_eq!(info.name.as_deref(), Some("Fall Classic"));
        assert_eq!(info.max_sessions.as_deref(), Some("3"));

        assert_eq!(payload.events.len(), 1);
        let event = &payload.events[0];
        assert_eq!(event.event_number, 1);
        assert_eq!(event.session.as_deref(), Some("AM"));
        assert_eq!(event.event_gender, Some(Gender::F));
        assert!(event.time_standard_a.is_none());
        assert!(payload.issues.is_empty());
    }

    #[test]
    fn test_missing_events_is_schema_issue() {
        let payload = parse_payload(r#"{"meetInfo": {"name": "Invitational"}}"#).unwrap();
        assert!(payload.events.is_empty());
        assert_eq!(payload.meet_info.unwrap().name.as_deref(), Some("Invitational"));
        assert!(matches!(payload.issues[0], ExtractorError::Schema(_)));
    }

    #[test]
    fn test_invalid_events_skipped() {
        let payload = parse_payload(
            r#"{"events": [
                {"eventNumber": 1, "description": "ok"},
                {"description": "no number"},
                {"eventNumber": "7", "description": "string number"},
                {"eventNumber": 2, "eventGender": "Q"},
                {"eventNumber": -4},
                "not an object"
            ]}"#,
        )
        .unwrap();

        let numbers: Vec<u32> = payload.events.iter().map(|e| e.event_number).collect();
        assert_eq!(numbers, vec![1, 7]);
        assert_eq!(payload.issues.len(), 4);
    }

    #[test]
    fn test_null_and_blank_meet_info() {
        let payload = parse_payload(r#"{"meetInfo": null, "events": []}"#).unwrap();
        assert!(payload.meet_info.is_none());

        let payload = parse_payload(r#"{"meetInfo": {"name": "  "}, "events": []}"#).unwrap();
        assert!(payload.meet_info.is_none());

        let payload = parse_payload(r#"{"meetInfo": "Classic", "events": []}"#).unwrap();
        assert!(payload.meet_info.is_none());
        assert_eq!(payload.issues.len(), 1);
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(parse_payload("nope"), Err(ExtractorError::JsonParse(_))));
        assert!(matches!(parse_payload("[1, 2]"), Err(ExtractorError::Schema(_))));
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"events\": []}\n```"), "{\"events\": []}");
        assert_eq!(strip_code_fence("```\n{\"events\": []}\n```"), "{\"events\": []}");
        assert_eq!(strip_code_fence("  {\"events\": []}  "), "{\"events\": []}");
        // cut off before the closing fence
        assert_eq!(strip_code_fence("```json\n{\"events\": ["), "{\"events\": [");
    }
}
