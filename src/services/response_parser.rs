//! Decoding of raw model output. `strict_decode` handles the normal case;
//! `recover_partial` salvages complete question objects from a response
//! whose tail was cut off or mangled.

use crate::error::GenerationDefect;
use crate::models::quiz::MIN_QUESTIONS;
use regex::Regex;
use serde_json::{json, Value as JsonValue};
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    pub document: JsonValue,
    pub recovered: bool,
}

/// Removes a surrounding markdown code fence, tolerating a missing closing
/// fence on truncated output.
pub fn strip_code_fence(raw: &str) -> &str {
    let mut body = raw.trim();
    if let Some(rest) = body.strip_prefix("```") {
        body = match rest.find('\n') {
            Some(pos) => &rest[pos + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
        };
    }
    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

/// Parses the whole response as JSON. A bare top-level array is accepted as
/// the questions list.
pub fn strict_decode(raw: &str) -> Option<JsonValue> {
    let value: JsonValue = serde_json::from_str(strip_code_fence(raw)).ok()?;
    match value {
        JsonValue::Array(items) => Some(json!({ "questions": items })),
        other => Some(other),
    }
}

fn question_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let s = r#""(?:[^"\\]|\\.)*""#;
        let pattern = format!(
            r#"\{{\s*"question"\s*:\s*{s}\s*,\s*"options"\s*:\s*\[\s*{s}\s*,\s*{s}\s*,\s*{s}\s*,\s*{s}\s*\]\s*,\s*"correctAnswer"\s*:\s*\d+\s*\}}"#,
            s = s
        );
        Regex::new(&pattern).expect("question recovery pattern is valid")
    })
}

/// Every well-formed four-option question object found anywhere in `raw`.
pub fn recover_questions(raw: &str) -> Vec<JsonValue> {
    question_pattern()
        .find_iter(raw)
        .filter_map(|m| serde_json::from_str::<JsonValue>(m.as_str()).ok())
        .collect()
}

/// Recovered questions wrapped as a document, or `None` when fewer than the
/// minimum quiz length survive.
pub fn recover_partial(raw: &str) -> Option<JsonValue> {
    let questions = recover_questions(raw);
    if questions.len() >= MIN_QUESTIONS {
        Some(json!({ "questions": questions }))
    } else {
        None
    }
}

pub fn parse_response(raw: &str) -> Result<ParsedResponse, GenerationDefect> {
    if let Some(document) = strict_decode(raw) {
        return Ok(ParsedResponse {
            document,
            recovered: false,
        });
    }

    tracing::warn!("strict JSON decode failed, attempting partial recovery");
    match recover_partial(raw) {
        Some(document) => Ok(ParsedResponse {
            document,
            recovered: true,
        }),
        None => Err(GenerationDefect::Unparseable {
            recovered: recover_questions(raw).len(),
            min: MIN_QUESTIONS,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question_json(i: usize) -> String {
        format!(
            r#"{{"question": "Question {i}?", "options": ["a{i}", "b{i}", "c \"quoted\"", "d"], "correctAnswer": {a}}}"#,
            i = i,
            a = i % 4
        )
    }

    fn truncated_response(complete: usize) -> String {
        let body: Vec<String> = (0..complete).map(question_json).collect();
        format!(
            r#"{{"questions": [{}, {{"question": "Cut off", "options": ["a", "b"#,
            body.join(", ")
        )
    }

    #[test]
    fn strict_decode_plain_object() {
        let doc = strict_decode(r#"{"questions": []}"#).unwrap();
        assert!(doc["questions"].is_array());
    }

    #[test]
    fn strict_decode_strips_fences() {
        let raw = "```json\n{\"questions\": [1, 2]}\n```";
        let doc = strict_decode(raw).unwrap();
        assert_eq!(doc["questions"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn strict_decode_wraps_top_level_array() {
        let doc = strict_decode("[{\"question\": \"x\"}]").unwrap();
        assert_eq!(doc["questions"][0]["question"], "x");
    }

    #[test]
    fn strict_decode_rejects_truncated_json() {
        assert!(strict_decode(&truncated_response(12)).is_none());
    }

    #[test]
    fn recovers_twelve_complete_objects_before_truncation() {
        let raw = truncated_response(12);
        let doc = recover_partial(&raw).expect("recovered");
        let qs = doc["questions"].as_array().unwrap();
        assert_eq!(qs.len(), 12);
        assert_eq!(qs[2]["options"][2], "c \"quoted\"");
        assert_eq!(qs[3]["correctAnswer"], 3);
    }

    #[test]
    fn recovery_below_minimum_is_none() {
        assert!(recover_partial(&truncated_response(9)).is_none());
        assert_eq!(recover_questions(&truncated_response(9)).len(), 9);
    }

    #[test]
    fn recovery_skips_objects_with_wrong_option_count() {
        let raw = r#"{"question": "q", "options": ["a", "b", "c"], "correctAnswer": 1}"#;
        assert!(recover_questions(raw).is_empty());
    }

    #[test]
    fn parse_response_marks_recovered_results() {
        let parsed = parse_response(&truncated_response(11)).unwrap();
        assert!(parsed.recovered);

        let full = format!(r#"{{"questions": [{}]}}"#, question_json(0));
        let parsed = parse_response(&full).unwrap();
        assert!(!parsed.recovered);
    }

    #[test]
    fn parse_response_counts_salvaged_questions_when_too_few() {
        let err = parse_response(&truncated_response(9)).unwrap_err();
        assert_eq!(
            err,
            GenerationDefect::Unparseable {
                recovered: 9,
                min: MIN_QUESTIONS
            }
        );

        let parsed = parse_response(&truncated_response(MIN_QUESTIONS)).unwrap();
        assert!(parsed.recovered);
        assert_eq!(parsed.document["questions"].as_array().unwrap().len(), MIN_QUESTIONS);
    }

    #[test]
    fn parse_response_reports_unparseable() {
        let err = parse_response("I'm sorry, I cannot help with that.").unwrap_err();
        assert_eq!(
            err,
            GenerationDefect::Unparseable {
                recovered: 0,
                min: MIN_QUESTIONS
            }
        );
    }

    #[test]
    fn fence_without_closing_marker() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
    }
}
