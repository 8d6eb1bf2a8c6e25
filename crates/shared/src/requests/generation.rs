use serde::{Deserialize, Serialize};
use specforge_domain::JsonObject;

/// Body of `POST /llm/generate-spec`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateSpecRequest {
    /// Free-text description of the desired game. Missing is treated as empty.
    #[serde(default)]
    pub brief: String,
    /// Extra structured constraints appended to the prompt verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<JsonObject>,
}

/// Body of `POST /llm/generate-code`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateCodeRequest {
    /// A specification document, optionally carrying its rendered `spec_markdown`.
    #[serde(default)]
    pub game_spec: JsonObject,
    #[serde(default)]
    pub output_format: OutputFormat,
}

/// Requested packaging of generated code.
///
/// Accepted for compatibility; the service always answers with a file list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Files,
    Zip,
}
