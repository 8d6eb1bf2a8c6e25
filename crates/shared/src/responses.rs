//! Response bodies for the HTTP API.

use serde::{Deserialize, Serialize};
use specforge_domain::{GeneratedFile, JsonObject, SpecDocument};

/// Response of `POST /llm/generate-spec`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSpecResponse {
    pub title: String,
    pub spec_markdown: String,
    /// Empty object (`{}`) when generation degraded to the fallback.
    pub spec_json: SpecDocument,
}

/// Response of `POST /llm/generate-code`.
///
/// Always returned with status 200; failures set `success: false` and `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateCodeResponse {
    pub success: bool,
    pub files: Vec<GeneratedFile>,
    pub project_structure: JsonObject,
    pub build_instructions: String,
    pub error: Option<String>,
}

/// One similarity search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarItem {
    pub spec_id: String,
    pub title: String,
    pub score: f32,
}

/// Response of `POST /vector/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub similar: Vec<SimilarItem>,
}

/// Response of `POST /vector/upsert`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertResponse {
    pub ok: bool,
    pub id: String,
}

/// Acknowledgement for collection and point deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
    pub message: String,
}

impl OkResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_spec_response_has_empty_spec_json() {
        let response = GenerateSpecResponse {
            title: "A puzzle".to_string(),
            spec_markdown: "# A puzzle".to_string(),
            spec_json: SpecDocument::default(),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["spec_json"], serde_json::json!({}));
    }

    #[test]
    fn test_code_response_serializes_null_error() {
        let response = GenerateCodeResponse {
            success: true,
            files: vec![GeneratedFile::new("index.html", "<html></html>", "html")],
            project_structure: JsonObject::new(),
            build_instructions: "Open index.html".to_string(),
            error: None,
        };

        let value = serde_json::to_value(&response).unwrap();
        assert!(value["error"].is_null());
        assert_eq!(value["files"][0]["file_type"], "html");
    }
}
