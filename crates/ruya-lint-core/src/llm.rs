//! Lenient handling of LLM replies.
//!
//! Diagnostic and meta/FAQ prompts ask the model for JSON, but replies often
//! wrap the object in prose or code fences. [`recover_json`] digs the object
//! out, or returns a placeholder that keeps the raw reply for display.

use regex::Regex;
use serde_json::{Value, json};
use std::sync::LazyLock;

/// Greedy outermost-brace span, across newlines.
static BRACED_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

/// Error tag for a braced span that is not valid JSON.
pub const FAILED_JSON_PARSE: &str = "failed_json_parse";

/// Error tag for a reply with no braced span at all.
pub const NO_JSON_FOUND: &str = "no_json_found";

/// Recover a JSON value from a model reply.
///
/// Tries the whole reply first, then the span from the first `{` to the last
/// `}`. When both fail the result is `{"raw": reply, "error": tag}` with tag
/// [`FAILED_JSON_PARSE`] or [`NO_JSON_FOUND`]. Never fails.
#[tracing::instrument(skip_all, fields(reply_len = reply.len()))]
pub fn recover_json(reply: &str) -> Value {
    if let Ok(value) = serde_json::from_str(reply) {
        return value;
    }

    let Some(span) = BRACED_SPAN.find(reply) else {
        tracing::debug!("no JSON object in reply");
        return json!({ "raw": reply, "error": NO_JSON_FOUND });
    };

    match serde_json::from_str(span.as_str()) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "braced span is not valid JSON");
            json!({ "raw": reply, "error": FAILED_JSON_PARSE })
        }
    }
}

/// `true` when `value` is a recovery placeholder rather than model output.
pub fn is_unrecovered(value: &Value) -> bool {
    value
        .get("error")
        .and_then(Value::as_str)
        .is_some_and(|tag| tag == FAILED_JSON_PARSE || tag == NO_JSON_FOUND)
        && value.get("raw").is_some()
}

/// The `fixes` list of a diagnostic object; empty when absent.
pub fn fix_plan(diagnostic: &Value) -> Vec<Value> {
    diagnostic
        .get("fixes")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clean_json() {
        let value = recover_json(r#"{"score": 7, "fixes": []}"#);
        assert_eq!(value["score"], 7);
        assert!(!is_unrecovered(&value));
    }

    #[test]
    fn parses_non_object_json_as_is() {
        assert_eq!(recover_json("[1, 2]"), json!([1, 2]));
    }

    #[test]
    fn extracts_object_wrapped_in_prose() {
        let reply = "إليك التشخيص:\n```json\n{\"fixes\": [{\"paragraph\": 2}]}\n```\nبالتوفيق";
        let value = recover_json(reply);
        assert_eq!(value["fixes"][0]["paragraph"], 2);
    }

    #[test]
    fn span_runs_from_first_open_to_last_close() {
        let reply = "a {\"x\": {\"y\": 1}} b";
        assert_eq!(recover_json(reply), json!({"x": {"y": 1}}));
    }

    #[test]
    fn reports_failed_parse() {
        let reply = "{not: json}";
        let value = recover_json(reply);
        assert_eq!(value["error"], FAILED_JSON_PARSE);
        assert_eq!(value["raw"], reply);
        assert!(is_unrecovered(&value));
    }

    #[test]
    fn reports_missing_json() {
        let value = recover_json("لا يوجد JSON هنا");
        assert_eq!(value["error"], NO_JSON_FOUND);
        assert!(is_unrecovered(&value));
    }

    #[test]
    fn two_objects_in_prose_fail_to_parse() {
        let value = recover_json("{\"a\": 1} and {\"b\": 2}");
        assert_eq!(value["error"], FAILED_JSON_PARSE);
    }

    #[test]
    fn fix_plan_reads_fixes_array() {
        let diag = json!({"fixes": [{"id": 1}, {"id": 2}]});
        assert_eq!(fix_plan(&diag).len(), 2);
    }

    #[test]
    fn fix_plan_is_empty_for_other_shapes() {
        assert!(fix_plan(&json!({"score": 3})).is_empty());
        assert!(fix_plan(&json!([1, 2])).is_empty());
        assert!(fix_plan(&json!({"fixes": "none"})).is_empty());
    }
}
