//! Serde helpers for decoding untrusted LLM JSON.
//!
//! Every helper here succeeds for any JSON input: a value of the wrong shape
//! decodes to the field's default instead of failing the enclosing document.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Decode `T`, falling back to `T::default()` when the value has the wrong shape.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Decode a list of strings.
///
/// A bare string becomes a one-element list. Scalars inside an array are
/// stringified; nested arrays, objects and nulls are dropped.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(strings_from_value(&value))
}

/// Decode a list of `T`, dropping entries that do not decode.
pub fn item_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// Render a scalar JSON value as plain text.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn strings_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "lenient")]
        count: Option<u32>,
        #[serde(default, deserialize_with = "string_list")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "item_list")]
        numbers: Vec<u8>,
    }

    #[test]
    fn test_wrong_shape_falls_back_to_default() {
        let probe: Probe = serde_json::from_value(json!({
            "count": "sixty",
            "tags": {"not": "a list"},
            "numbers": "nope"
        }))
        .unwrap();

        assert_eq!(probe.count, None);
        assert!(probe.tags.is_empty());
        assert!(probe.numbers.is_empty());
    }

    #[test]
    fn test_bare_string_becomes_single_item_list() {
        let probe: Probe = serde_json::from_value(json!({"tags": "web"})).unwrap();
        assert_eq!(probe.tags, vec!["web".to_string()]);
    }

    #[test]
    fn test_mixed_list_keeps_scalars_and_drops_the_rest() {
        let probe: Probe = serde_json::from_value(json!({
            "tags": ["mouse", 3, true, null, ["nested"]],
            "numbers": [1, "two", 3, 999]
        }))
        .unwrap();

        assert_eq!(probe.tags, vec!["mouse", "3", "true"]);
        assert_eq!(probe.numbers, vec![1, 3]);
    }
}
