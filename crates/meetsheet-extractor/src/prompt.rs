//! Request construction for prompted extraction

use meetsheet_domain::{ChatMessage, Chunk, CompletionRequest};

/// Builds the completion request for one chunk
pub struct PromptBuilder<'a> {
    chunk: &'a Chunk,
    context: &'a str,
    max_tokens: u32,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(chunk: &'a Chunk, context: &'a str) -> Self {
        Self {
            chunk,
            context,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Override the output token ceiling
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Build the system + user request
    pub fn build(&self) -> CompletionRequest {
        let mut request = CompletionRequest::new(vec![
            ChatMessage::system(self.system_message()),
            ChatMessage::user(self.user_message()),
        ]);
        request.max_tokens = self.max_tokens;
        request
    }

    fn system_message(&self) -> String {
        let mut prompt = String::new();

        // 1. Fixed domain rules
        prompt.push_str(DOMAIN_RULES);
        prompt.push_str("\n\n");

        // 2. Running meet context
        prompt.push_str("MEET CONTEXT (rules and session info):\n");
        if self.context.trim().is_empty() {
            prompt.push_str("No additional context available");
        } else {
            prompt.push_str(self.context.trim());
        }
        prompt.push_str("\n\n");

        // 3. Chunk position
        prompt.push_str(&format!(
            "CHUNKING NOTE: This is chunk {} of {}. Extract every event you see, even partial ones; \
             duplicate event numbers across chunks are merged later. If the chunk holds no \
             complete event, return {{\"meetInfo\": null, \"events\": []}}.\n\n",
            self.chunk.number(),
            self.chunk.total
        ));

        prompt.push_str(JSON_ONLY);
        prompt
    }

    fn user_message(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str("Parse this swim meet schedule into JSON.\n\n");
        prompt.push_str(&format!(
            "DOCUMENT TEXT (chunk {}/{}):\n---\n",
            self.chunk.number(),
            self.chunk.total
        ));
        prompt.push_str(&self.chunk.text);
        prompt.push_str("\n---\n\n");

        prompt.push_str(TARGET_SCHEMA);
        prompt.push_str("\n\n");
        prompt.push_str(HEADER_REMINDER);
        prompt.push_str("\n\n");
        prompt.push_str(JSON_ONLY);
        prompt
    }
}

/// Output ceiling used when none is configured
pub const DEFAULT_MAX_TOKENS: u32 = 6000;

const DOMAIN_RULES: &str = r#"You extract structured event data from swim meet programs.

NOTATION:
- Gender: "Girls" or "Women" = "F"; "Boys" or "Men" = "M"; no gender given = "Mixed"
- Age groups are written like "10 & Under", "11-12", "13-14", "13 & Over", "Open"
- "8&9" means ages 8 and 9 swim together

DAY AND SESSION HEADERS:
- A header such as "Friday AM", "Saturday PM" or "Session 2" applies to every event below it until the next header
- "day" is the weekday name; "session" is either "AM"/"PM" or "Session N", exactly as printed
- Never convert "AM"/"PM" into "Session N" or the reverse
- Use the most recent header; do not leave day or session empty when a header is in force

DUAL-COLUMN ROWS:
- Tables laid out as "Girls Event # | Event | Boys Event #" describe TWO events per row
- The left number is the girls event (eventGender "F"), the right number is the boys event (eventGender "M")
- Both share the description
- Example: "39 | 10 & Under 100 IM | 40" gives
  * event 39: "10 & Under 100 IM", eventGender "F"
  * event 40: "10 & Under 100 IM", eventGender "M""#;

const TARGET_SCHEMA: &str = r#"Return exactly this structure:
{
  "meetInfo": {
    "name": "Meet Name",
    "date": "2025-11-15",
    "maxEventsPerDay": "5 per day",
    "maxTotalEvents": "10 total",
    "maxSessions": "3"
  },
  "events": [
    {
      "eventNumber": 1,
      "day": "Friday",
      "session": "AM",
      "description": "8 & Under 25 Free",
      "ageGroup": "8 & Under",
      "eventGender": "F",
      "timeStandardA": null,
      "timeStandardB": null,
      "notes": null
    },
    {
      "eventNumber": 2,
      "day": "Saturday",
      "session": "Session 2",
      "description": "10 & Under 50 Free",
      "ageGroup": "10 & Under",
      "eventGender": "M",
      "timeStandardA": null,
      "timeStandardB": null,
      "notes": null
    }
  ]
}"#;

const HEADER_REMINDER: &str = r#"Remember: headers like "Saturday PM", "Friday AM" or "Session 2" sit above a group of events.
Every event in that group takes the header's day and session."#;

const JSON_ONLY: &str = "Output pure JSON only: no markdown, no code fences, no commentary. \
The response must start with { and end with }.";
