//! Pulls a JSON value out of free-form completion text.
//!
//! Matching is greedy: the object candidate runs from the first `{` to the
//! last `}` and the array candidate from the first `[` to the last `]`. A
//! single JSON value wrapped in prose or code fences therefore parses, while
//! two separate fragments produce one span that fails strict parsing and the
//! text yields no result. Candidates are tried in order of where they start.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AutosalesError, Result};

static OBJECT_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("object span pattern is valid"));
static ARRAY_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("array span pattern is valid"));

/// Returns the first delimiter span that parses as JSON, or `None`.
pub fn extract_json(text: &str) -> Option<Value> {
    let mut spans: Vec<(usize, &str)> = [&*OBJECT_SPAN, &*ARRAY_SPAN]
        .iter()
        .filter_map(|re| re.find(text))
        .map(|m| (m.start(), m.as_str()))
        .collect();
    spans.sort_by_key(|(start, _)| *start);

    spans
        .into_iter()
        .find_map(|(_, span)| serde_json::from_str::<Value>(span).ok())
}

/// Extracts a JSON value and deserializes it into `T`.
///
/// Absence and shape mismatches are both reported as errors so callers can
/// route them into the same fallback path as transport failures.
pub fn parse_completion<T: DeserializeOwned>(text: &str) -> Result<T> {
    let value = extract_json(text).ok_or(AutosalesError::NoJson)?;
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_object() {
        let value = extract_json(r#"{"subject":"S","body":"B"}"#).unwrap();
        assert_eq!(value, json!({"subject": "S", "body": "B"}));
    }

    #[test]
    fn test_object_inside_prose_and_fences() {
        let text = "Here is the draft:\n```json\n{\n  \"subject\": \"안녕하세요\",\n  \"body\": \"본문\"\n}\n```\nLet me know!";
        let value = extract_json(text).unwrap();
        assert_eq!(value["subject"], "안녕하세요");
    }

    #[test]
    fn test_nested_braces_are_kept() {
        let value = extract_json(r#"{"intent":"initial_email","params":{"project_id":1}}"#).unwrap();
        assert_eq!(value["params"]["project_id"], 1);
    }

    #[test]
    fn test_array_before_object() {
        let value = extract_json(r#"Issues: ["too long", {"x": 1}]"#).unwrap();
        assert!(value.is_array());
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_falls_back_to_later_candidate() {
        // The array span "[see below] ... " is not valid JSON; the object is.
        let value = extract_json(r#"[see below] {"priority":"low"}"#).unwrap();
        assert_eq!(value["priority"], "low");
    }

    #[test]
    fn test_no_braces_is_none() {
        assert_eq!(extract_json("I cannot help with that."), None);
        assert_eq!(extract_json(""), None);
    }

    #[test]
    fn test_malformed_is_none() {
        assert_eq!(extract_json("{subject: S, body: B}"), None);
        assert_eq!(extract_json("{\"subject\": \"unterminated}"), None);
        assert_eq!(extract_json("}{"), None);
    }

    #[test]
    fn test_two_fragments_greedy_span_fails() {
        let text = r#"{"subject":"A"} and also {"subject":"B"}"#;
        assert_eq!(extract_json(text), None);
    }

    #[test]
    fn test_parse_completion_shape_mismatch_is_error() {
        #[derive(Debug, serde::Deserialize)]
        struct Draft {
            #[allow(dead_code)]
            subject: String,
        }
        assert!(parse_completion::<Draft>(r#"{"subject": 42}"#).is_err());
        assert!(matches!(
            parse_completion::<Draft>("nothing here"),
            Err(AutosalesError::NoJson)
        ));
    }
}
