//! AutoGen conversation logs (JSON array or JSON Lines).
//!
//! Entries are loosely shaped; the fields looked at are:
//! - `sender` / `name` / `from`: the speaking agent
//! - `recipient` / `to`: the addressed agent, `"all"` for group broadcasts
//! - `message` (string or object), `content`, `text`: the message body
//! - `timestamp` / `time` / `created_at` / `date`: unix seconds or ISO 8601
//! - `type`, `role`, `function_call`: hints for the message category

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use super::{LogParser, ParseError, ParseResult};
use crate::types::{Message, MessageCategory, Metadata, Timestamp};

const SENDER_KEYS: [&str; 3] = ["sender", "name", "from"];
const RECEIVER_KEYS: [&str; 2] = ["recipient", "to"];
const TIMESTAMP_KEYS: [&str; 4] = ["timestamp", "time", "created_at", "date"];

/// Receiver value AutoGen group chats use for "everyone".
const BROADCAST_RECEIVER: &str = "all";

const DELEGATION_KEYWORDS: [&str; 6] = [
    "please",
    "can you",
    "could you",
    "implement",
    "create",
    "build",
];
const THOUGHT_KEYWORDS: [&str; 4] = ["thinking", "analyzing", "considering", "let me think"];
const ACTION_KEYWORDS: [&str; 4] = ["executing", "running", "calling", "function_call"];

/// Parser for AutoGen conversation logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoGenParser;

impl LogParser for AutoGenParser {
    fn framework(&self) -> &'static str {
        "autogen"
    }

    fn parse(&self, bytes: &[u8]) -> ParseResult<Vec<Message>> {
        let text = std::str::from_utf8(bytes)?;
        let mut messages = Vec::new();

        if text.trim_start().starts_with('[') {
            let entries: Vec<Value> =
                serde_json::from_str(text).map_err(|source| ParseError::InvalidJson {
                    line: source.line(),
                    source,
                })?;
            for (idx, entry) in entries.iter().enumerate() {
                let entry = as_object(entry, idx + 1)?;
                messages.extend(parse_entry(entry, idx as u64));
            }
        } else {
            for (idx, line) in text.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let entry: Value =
                    serde_json::from_str(line).map_err(|source| ParseError::InvalidJson {
                        line: idx + 1,
                        source,
                    })?;
                let entry = as_object(&entry, idx + 1)?;
                messages.extend(parse_entry(entry, idx as u64));
            }
        }

        if messages.is_empty() {
            return Err(ParseError::NoMessages);
        }
        Ok(messages)
    }
}

fn as_object(entry: &Value, line: usize) -> ParseResult<&Map<String, Value>> {
    entry.as_object().ok_or_else(|| ParseError::InvalidEntry {
        line,
        reason: "expected a JSON object".to_string(),
    })
}

/// Convert one log entry; `None` for entries without content.
fn parse_entry(entry: &Map<String, Value>, step_index: u64) -> Option<Message> {
    let content = extract_content(entry)?;
    if content.trim().is_empty() {
        tracing::debug!("Skipping entry {step_index}: empty content");
        return None;
    }

    let sender = first_text(entry, &SENDER_KEYS).unwrap_or_else(|| "unknown".to_string());
    let receiver =
        first_text(entry, &RECEIVER_KEYS).filter(|r| r.as_str() != BROADCAST_RECEIVER);

    let timestamp = extract_timestamp(entry, step_index);
    let category = infer_category(entry, &content);

    let mut metadata = Metadata::new();
    if let Some(role) = entry.get("role").and_then(Value::as_str) {
        metadata.insert("role", role);
    }
    if let Some(tokens) = entry.get("token_count").and_then(Value::as_i64) {
        metadata.insert("token_count", tokens);
    }

    Some(Message {
        step_index,
        timestamp,
        sender,
        receiver,
        category,
        content,
        metadata,
    })
}

/// First key among `keys` holding a non-empty string or a number.
fn first_text(entry: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match entry.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn extract_content(entry: &Map<String, Value>) -> Option<String> {
    if let Some(message) = entry.get("message") {
        return match message {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Object(inner) => first_text(inner, &["content", "text"])
                .or_else(|| Some(message.to_string())),
            other => Some(other.to_string()),
        };
    }
    ["content", "text"]
        .iter()
        .find_map(|key| entry.get(*key))
        .and_then(|v| match v {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
}

/// Timestamp from the entry, or a synthetic one spaced one millisecond per
/// step from 2024-01-01 when the log carries none.
fn extract_timestamp(entry: &Map<String, Value>, step_index: u64) -> Timestamp {
    for key in TIMESTAMP_KEYS {
        let parsed = match entry.get(key) {
            Some(Value::Number(n)) => n.as_f64().and_then(from_unix_seconds),
            Some(Value::String(s)) => parse_datetime(s),
            _ => None,
        };
        if let Some(ts) = parsed {
            return ts;
        }
    }
    inferred_timestamp(step_index)
}

pub(crate) fn inferred_timestamp(step_index: u64) -> Timestamp {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default();
    let offset = i64::try_from(step_index).unwrap_or(i64::MAX);
    base.checked_add_signed(Duration::milliseconds(offset))
        .unwrap_or(base)
}

fn from_unix_seconds(secs: f64) -> Option<Timestamp> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round() as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
}

fn parse_datetime(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    // Naive timestamps are taken as UTC.
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn infer_category(entry: &Map<String, Value>, content: &str) -> MessageCategory {
    if let Some(category) = entry
        .get("type")
        .and_then(Value::as_str)
        .and_then(MessageCategory::from_name)
    {
        return category;
    }

    let is_system = entry
        .get("role")
        .and_then(Value::as_str)
        .is_some_and(|r| r.eq_ignore_ascii_case("system"));
    if is_system {
        return MessageCategory::System;
    }

    let lower = content.to_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    if mentions(&DELEGATION_KEYWORDS) {
        MessageCategory::Delegation
    } else if mentions(&THOUGHT_KEYWORDS) {
        MessageCategory::Thought
    } else if mentions(&ACTION_KEYWORDS) || entry.contains_key("function_call") {
        MessageCategory::Action
    } else {
        MessageCategory::Response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MetaValue;

    const SAMPLE_JSONL: &str = r#"
{"sender": "Manager", "recipient": "Coder", "message": "Please implement the login page", "role": "user", "timestamp": "2024-01-15T10:00:00Z"}
{"sender": "Coder", "recipient": "Manager", "message": "Done, the login page is ready.", "role": "assistant", "timestamp": "2024-01-15T10:00:05Z", "token_count": 9}

{"sender": "Manager", "recipient": "all", "message": "Standup in five minutes", "role": "user"}
{"sender": "Coder", "recipient": "Manager", "message": "", "role": "assistant"}
"#;

    #[test]
    fn test_parse_jsonl() {
        let messages = AutoGenParser.parse(SAMPLE_JSONL.as_bytes()).unwrap();
        assert_eq!(messages.len(), 3);

        let first = &messages[0];
        assert_eq!(first.sender, "Manager");
        assert_eq!(first.receiver.as_deref(), Some("Coder"));
        assert_eq!(first.category, MessageCategory::Delegation);
        assert_eq!(first.metadata.get("role"), Some(&MetaValue::Text("user".into())));

        let second = &messages[1];
        assert_eq!(second.category, MessageCategory::Response);
        assert_eq!(second.metadata.get("token_count"), Some(&MetaValue::Integer(9)));
        assert_eq!(
            second.timestamp,
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 5).unwrap()
        );
    }

    #[test]
    fn test_step_index_follows_line_position() {
        let messages = AutoGenParser.parse(SAMPLE_JSONL.as_bytes()).unwrap();
        // Leading blank line is line 0; the broadcast sits after a blank line.
        let steps: Vec<u64> = messages.iter().map(|m| m.step_index).collect();
        assert_eq!(steps, vec![1, 2, 4]);
    }

    #[test]
    fn test_all_receiver_is_broadcast() {
        let messages = AutoGenParser.parse(SAMPLE_JSONL.as_bytes()).unwrap();
        assert!(messages[2].is_broadcast());
        assert_eq!(messages[2].timestamp, inferred_timestamp(4));
    }

    #[test]
    fn test_parse_json_array_with_alternate_keys() {
        let log = r#"[
            {"name": "Planner", "to": "Executor", "message": {"content": "Executing step one"}, "time": 1705312800},
            {"from": "Executor", "to": "Planner", "content": "Let me think about this", "created_at": "2024-01-15 10:00:03"},
            {"from": "Executor", "to": "Planner", "text": "result: 42", "function_call": {"name": "calc"}}
        ]"#;
        let messages = AutoGenParser.parse(log.as_bytes()).unwrap();
        assert_eq!(messages.len(), 3);

        assert_eq!(messages[0].sender, "Planner");
        assert_eq!(messages[0].content, "Executing step one");
        assert_eq!(messages[0].category, MessageCategory::Action);
        assert_eq!(
            messages[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
        );

        assert_eq!(messages[1].category, MessageCategory::Thought);
        assert_eq!(
            messages[1].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 3).unwrap()
        );

        assert_eq!(messages[2].category, MessageCategory::Action);
        assert_eq!(messages[2].step_index, 2);
    }

    #[test]
    fn test_explicit_type_and_system_role() {
        let log = concat!(
            r#"{"sender": "Reviewer", "recipient": "Coder", "message": "please fix", "type": "feedback"}"#,
            "\n",
            r#"{"sender": "Admin", "recipient": "Coder", "message": "You are a coder.", "role": "system"}"#,
        );
        let messages = AutoGenParser.parse(log.as_bytes()).unwrap();
        assert_eq!(messages[0].category, MessageCategory::Feedback);
        assert_eq!(messages[1].category, MessageCategory::System);
    }

    #[test]
    fn test_invalid_json_line_reports_line_number() {
        let log = "{\"sender\": \"A\", \"message\": \"hi\"}\n{\"broken\":\n";
        let err = AutoGenParser.parse(log.as_bytes()).unwrap_err();
        match err {
            ParseError::InvalidJson { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_object_entry() {
        let err = AutoGenParser.parse(b"[1, 2]").unwrap_err();
        assert!(matches!(err, ParseError::InvalidEntry { line: 1, .. }));
    }

    #[test]
    fn test_no_messages() {
        let log = r#"{"sender": "A", "recipient": "B", "message": "   "}"#;
        let err = AutoGenParser.parse(log.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::NoMessages));
    }

    #[test]
    fn test_inferred_timestamps_are_spaced_by_step() {
        assert!(inferred_timestamp(0) < inferred_timestamp(1));
        assert_eq!(
            inferred_timestamp(1500) - inferred_timestamp(0),
            Duration::milliseconds(1500)
        );
    }

    #[test]
    fn test_missing_sender_defaults_to_unknown() {
        let log = r#"{"recipient": "B", "message": "status?"}"#;
        let messages = AutoGenParser.parse(log.as_bytes()).unwrap();
        assert_eq!(messages[0].sender, "unknown");
    }
}
