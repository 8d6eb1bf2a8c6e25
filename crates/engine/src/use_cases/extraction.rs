//! Recovery of a JSON object from free-form LLM output.
//!
//! Models wrap JSON in prose, code fences or both. Each strategy below takes
//! the original text and either returns an object or gives up; [`extract`]
//! tries them in order and the first success wins.

use serde_json::Value;
use specforge_domain::JsonObject;

/// Maximum number of characters of the raw text kept for error context.
const PREVIEW_CHARS: usize = 200;

/// Conversational openers removed by [`stripped`], matched case-insensitively in this order.
const PREFIXES: [&str; 6] = ["Here is", "Here's", "```json", "```", "The JSON", "JSON:"];

/// Closers removed by [`stripped`], matched case-insensitively in this order.
const SUFFIXES: [&str; 3] = ["```", "Let me know", "Hope this helps"];

/// A single extraction heuristic.
pub type Strategy = fn(&str) -> Option<JsonObject>;

/// All strategies in the order [`extract`] applies them.
pub const STRATEGIES: [(&str, Strategy); 4] = [
    ("direct", direct),
    ("fenced", fenced),
    ("boundary", boundary),
    ("stripped", stripped),
];

/// Every strategy failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("No JSON object found in LLM response: {preview}")]
pub struct ExtractionFailure {
    /// Leading part of the text that could not be parsed.
    pub preview: String,
}

impl ExtractionFailure {
    fn for_text(raw: &str) -> Self {
        Self {
            preview: preview(raw),
        }
    }
}

/// What the spec-generation path recovered.
#[derive(Debug, Clone, PartialEq)]
pub enum SpecExtraction {
    /// `{"markdown": "...", "json": {...}}`
    Combined { markdown: String, json: JsonObject },
    /// A bare specification object.
    Document(JsonObject),
    /// Prose followed by a trailing JSON object.
    Trailing { prose: String, json: JsonObject },
}

/// Recover a JSON object from raw LLM text.
pub fn extract(raw: &str) -> Result<JsonObject, ExtractionFailure> {
    for (name, strategy) in STRATEGIES {
        if let Some(object) = strategy(raw) {
            tracing::debug!(strategy = name, keys = object.len(), "Extracted JSON object");
            return Ok(object);
        }
    }
    Err(ExtractionFailure::for_text(raw))
}

/// Recover a specification from raw LLM text.
///
/// Falls back to [`trailing_object`] when the regular strategies fail, since
/// spec prompts may yield prose followed by JSON.
pub fn extract_spec(raw: &str) -> Result<SpecExtraction, ExtractionFailure> {
    if let Ok(object) = extract(raw) {
        return Ok(classify(object));
    }

    let (prose, json) = trailing_object(raw).ok_or_else(|| ExtractionFailure::for_text(raw))?;
    tracing::debug!(prose_len = prose.len(), "Extracted trailing JSON object");
    Ok(match classify(json) {
        SpecExtraction::Document(json) => SpecExtraction::Trailing { prose, json },
        combined => combined,
    })
}

fn classify(object: JsonObject) -> SpecExtraction {
    match (object.get("markdown"), object.get("json")) {
        (Some(Value::String(markdown)), Some(Value::Object(json))) => SpecExtraction::Combined {
            markdown: markdown.clone(),
            json: json.clone(),
        },
        _ => SpecExtraction::Document(object),
    }
}

// =============================================================================
// Strategies
// =============================================================================

/// The whole trimmed text is one object.
pub fn direct(raw: &str) -> Option<JsonObject> {
    let text = raw.trim();
    if text.starts_with('{') && text.ends_with('}') {
        parse_object(text)
    } else {
        None
    }
}

/// The content of the first ```` ```json ```` fence.
pub fn fenced(raw: &str) -> Option<JsonObject> {
    const FENCE: &str = "```json";
    let start = raw.find(FENCE)? + FENCE.len();
    let end = start + raw[start..].find("```")?;
    parse_object(raw[start..end].trim())
}

/// Everything from the first `{` to the last `}`.
pub fn boundary(raw: &str) -> Option<JsonObject> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if start >= end {
        return None;
    }
    parse_object(&raw[start..=end])
}

/// [`boundary`] after removing known conversational prefixes and suffixes.
pub fn stripped(raw: &str) -> Option<JsonObject> {
    let mut text = raw.trim();
    for prefix in PREFIXES {
        if let Some(rest) = strip_prefix_ignore_case(text, prefix) {
            text = rest.trim();
        }
    }
    for suffix in SUFFIXES {
        if let Some(rest) = strip_suffix_ignore_case(text, suffix) {
            text = rest.trim();
        }
    }
    boundary(text)
}

/// The innermost-first object ending at the last `}`, plus the prose before it.
///
/// Walks `{` positions from the last one outward so a JSON block that follows
/// prose containing stray braces is still found.
pub fn trailing_object(raw: &str) -> Option<(String, JsonObject)> {
    let end = raw.rfind('}')?;
    raw[..end]
        .match_indices('{')
        .map(|(idx, _)| idx)
        .rev()
        .find_map(|start| {
            parse_object(&raw[start..=end]).map(|json| (raw[..start].trim().to_string(), json))
        })
}

fn parse_object(text: &str) -> Option<JsonObject> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

fn strip_suffix_ignore_case<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let split = text.len().checked_sub(suffix.len())?;
    let tail = text.get(split..)?;
    tail.eq_ignore_ascii_case(suffix).then(|| &text[..split])
}

/// First [`PREVIEW_CHARS`] characters of `text`, for logs and error messages.
pub fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn sample_spec() -> JsonObject {
        object(json!({
            "title": "Gem Match",
            "description": "Swap gems to make rows of three.",
            "genre": "match-3 puzzle",
            "duration_sec": 90,
            "platform": ["web", "mobile"],
            "game_modes": [{"mode": "vs_ai", "description": "Solo", "ai_behavior": "greedy"}],
            "objectives": {"primary_goal": "Clear the board", "secondary_goals": ["Combo x5"]},
            "visual_style": {"art_direction": "Pastel"}
        }))
    }

    #[test]
    fn test_serialized_document_round_trips() {
        let original = sample_spec();
        let text = serde_json::to_string_pretty(&original).unwrap();

        assert_eq!(extract(&text).unwrap(), original);
    }

    #[test]
    fn test_fenced_text_matches_unwrapped_text() {
        let inner = serde_json::to_string(&sample_spec()).unwrap();
        let wrapped = format!("Sure, here you go:\n```json\n{inner}\n```\nEnjoy!");

        assert_eq!(extract(&wrapped).unwrap(), extract(&inner).unwrap());
    }

    #[test]
    fn test_object_inside_prose_is_recovered() {
        let text = r#"I designed this one for you. {"title": "Orbit", "genre": "arcade"} Let me know what you think."#;

        let recovered = extract(text).unwrap();
        assert_eq!(recovered, object(json!({"title": "Orbit", "genre": "arcade"})));
    }

    #[test]
    fn test_plain_text_is_failure_with_preview() {
        let err = extract("not json at all").unwrap_err();
        assert_eq!(err.preview, "not json at all");
        assert!(err.to_string().contains("not json at all"));
    }

    #[test]
    fn test_arrays_do_not_count_as_success() {
        assert!(extract("[1, 2, 3]").is_err());
        assert!(direct("{\"a\": 1} trailing").is_none());
    }

    #[test]
    fn test_fenced_wins_only_when_direct_fails() {
        let text = "```json\n{\"a\": 1}\n```\nAlternative: {\"b\": 2}";
        assert!(direct(text).is_none());
        assert_eq!(extract(text).unwrap(), object(json!({"a": 1})));

        let direct_text = r#"{"a": "```json {\"b\": 2} ```"}"#;
        assert_eq!(
            extract(direct_text).unwrap(),
            object(json!({"a": "```json {\"b\": 2} ```"}))
        );
    }

    #[test]
    fn test_each_strategy_is_callable_alone() {
        assert!(direct("  {\"k\": true}  ").is_some());
        assert!(fenced("x ```json {\"k\": true} ``` y").is_some());
        assert!(fenced("{\"k\": true}").is_none());
        assert!(boundary("say {\"k\": true} done").is_some());
        assert!(boundary("} backwards {").is_none());
        assert!(stripped("HERE IS {\"k\": true} hope this helps").is_some());
    }

    #[test]
    fn test_stripping_is_case_insensitive_and_ordered() {
        assert_eq!(
            strip_prefix_ignore_case("here's the thing", "Here's"),
            Some(" the thing")
        );
        assert_eq!(strip_suffix_ignore_case("done ```", "```"), Some("done "));
        assert_eq!(strip_prefix_ignore_case("Hi", "Here is"), None);
    }

    #[test]
    fn test_unicode_text_does_not_panic() {
        let text = "Voilà ✨ no braces here, only ünïcödé";
        assert!(extract(text).is_err());
        assert!(extract_spec(text).is_err());
        assert!(stripped("é").is_none());
    }

    #[test]
    fn test_spec_combined_shape_keeps_markdown_verbatim() {
        let text = json!({
            "markdown": "# Gem Match\n\n## Overview\nMatch gems.",
            "json": {"title": "Gem Match"}
        })
        .to_string();

        match extract_spec(&text).unwrap() {
            SpecExtraction::Combined { markdown, json } => {
                assert_eq!(markdown, "# Gem Match\n\n## Overview\nMatch gems.");
                assert_eq!(json["title"], "Gem Match");
            }
            other => panic!("expected combined shape, got {other:?}"),
        }
    }

    #[test]
    fn test_spec_markdown_without_json_object_is_plain_document() {
        let text = r##"{"markdown": "# X", "json": "not an object"}"##;
        assert!(matches!(
            extract_spec(text).unwrap(),
            SpecExtraction::Document(_)
        ));
    }

    #[test]
    fn test_spec_trailing_object_after_prose_with_braces() {
        let text = "# Orbit\n\nUse {arrow keys} to steer.\n\n{\"title\": \"Orbit\", \"meta\": {\"v\": 1}}";

        assert!(extract(text).is_err());
        match extract_spec(text).unwrap() {
            SpecExtraction::Trailing { prose, json } => {
                assert_eq!(prose, "# Orbit\n\nUse {arrow keys} to steer.");
                assert_eq!(json, object(json!({"title": "Orbit", "meta": {"v": 1}})));
            }
            other => panic!("expected trailing shape, got {other:?}"),
        }
    }

    #[test]
    fn test_preview_is_truncated_on_char_boundary() {
        let long = "é".repeat(500);
        let shown = preview(&long);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().count(), PREVIEW_CHARS + 3);
    }
}
