//! Game specification document recovered from LLM output.
//!
//! Every field tolerates absence. Fields with the wrong JSON shape decode as
//! absent, and keys the schema does not name are kept in `extra` so the
//! document can be handed back to callers without losing anything.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::lenient::{item_list, lenient, scalar_text, string_list, strings_from_value};

/// A JSON object with insertion-ordered keys.
pub type JsonObject = Map<String, Value>;

/// Duration used when the document does not carry `duration_sec`.
pub const DEFAULT_DURATION_SEC: u32 = 60;

/// Structured game specification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecDocument {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "String::is_empty")]
    pub genre: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "String::is_empty")]
    pub core_concept: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "String::is_empty")]
    pub how_to_play: String,
    /// Raw value; use [`SpecDocument::duration_sec`] to read with the default applied.
    #[serde(
        default,
        rename = "duration_sec",
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<u32>,
    #[serde(default, deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub platform: Vec<String>,
    #[serde(default, deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub controls: Vec<String>,
    #[serde(default, deserialize_with = "item_list", skip_serializing_if = "Vec::is_empty")]
    pub game_modes: Vec<GameMode>,
    #[serde(default, deserialize_with = "item_list", skip_serializing_if = "Vec::is_empty")]
    pub detailed_mechanics: Vec<Mechanic>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Objectives::is_empty")]
    pub objectives: Objectives,
    #[serde(default, skip_serializing_if = "LabeledValues::is_empty")]
    pub visual_style: LabeledValues,
    #[serde(default, skip_serializing_if = "LabeledValues::is_empty")]
    pub technical_requirements: LabeledValues,
    #[serde(default, skip_serializing_if = "LabeledValues::is_empty")]
    pub game_flow: LabeledValues,
    #[serde(default, deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub unique_features: Vec<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "String::is_empty")]
    pub difficulty_progression: String,
    #[serde(default, deserialize_with = "item_list", skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<AssetGroup>,
    /// Keys not covered by the fields above, in their original order.
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl SpecDocument {
    /// Decode a document from a recovered JSON object.
    ///
    /// Never fails: mismatched fields are dropped individually.
    pub fn from_object(object: JsonObject) -> Self {
        serde_json::from_value(Value::Object(object)).unwrap_or_default()
    }

    /// Play duration in seconds, defaulting to [`DEFAULT_DURATION_SEC`].
    pub fn duration_sec(&self) -> u32 {
        self.duration.unwrap_or(DEFAULT_DURATION_SEC)
    }

    /// The title with surrounding whitespace removed, if there is one.
    pub fn display_title(&self) -> Option<&str> {
        let title = self.title.trim();
        (!title.is_empty()).then_some(title)
    }

    /// Read a string value stored under a key the schema does not name.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

/// One way of playing the game, e.g. `vs_ai` or `pvp_online`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameMode {
    #[serde(default, deserialize_with = "lenient")]
    pub mode: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub ai_behavior: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub networking: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub gameplay_differences: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub competitive_elements: Option<String>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mechanic {
    #[serde(default, deserialize_with = "lenient")]
    pub mechanic_name: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "String::is_empty")]
    pub player_interaction: String,
}

/// Goals of the game. Each entry may be a sentence or a list of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Objectives {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_goal: Option<FieldValue>,
    #[serde(default, deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub secondary_goals: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progression_system: Option<FieldValue>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl Objectives {
    pub fn is_empty(&self) -> bool {
        self.primary_goal.is_none()
            && self.secondary_goals.is_empty()
            && self.progression_system.is_none()
            && self.extra.is_empty()
    }
}

/// A named group of assets the game needs (sprites, sounds, UI).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetGroup {
    #[serde(default, deserialize_with = "lenient")]
    pub category: String,
    #[serde(default, deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Value of a labeled entry in visual style, technical requirements or game flow.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    /// Numbers, booleans and nested objects, kept as JSON.
    Other(Value),
}

impl FieldValue {
    /// Plain-text form: lists are comma-joined, other JSON is printed compactly.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::List(items) => items.join(", "),
            FieldValue::Other(value) => scalar_text(value).unwrap_or_else(|| value.to_string()),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            FieldValue::Text(text) => Value::String(text.clone()),
            FieldValue::List(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            FieldValue::Other(value) => value.clone(),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from)
    }
}

impl Serialize for FieldValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => FieldValue::Text(text),
            Value::Array(_) => FieldValue::List(strings_from_value(&value)),
            other => FieldValue::Other(other),
        }
    }
}

/// Ordered `label -> value` entries.
///
/// Decoded from a JSON object; anything else decodes as empty. Null values
/// are treated as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledValues(pub Vec<(String, FieldValue)>);

impl LabeledValues {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(label, value)| (label.as_str(), value))
    }
}

impl<'de> Deserialize<'de> for LabeledValues {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Value::Object(map) = Value::deserialize(deserializer)? else {
            return Ok(Self::default());
        };

        Ok(Self(
            map.into_iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(label, value)| (label, FieldValue::from(value)))
                .collect(),
        ))
    }
}

impl Serialize for LabeledValues {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, value) in &self.0 {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}
