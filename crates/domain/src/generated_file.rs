//! Source files emitted by code generation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DomainError;

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
    pub file_type: String,
}

impl GeneratedFile {
    pub fn new(
        path: impl Into<String>,
        content: impl Into<String>,
        file_type: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            file_type: file_type.into(),
        }
    }

    /// Validate one entry of an LLM `files` array.
    ///
    /// `path`, `content` and `file_type` must all be non-empty strings.
    pub fn from_value(value: &Value) -> Result<Self, DomainError> {
        let entry = value
            .as_object()
            .ok_or_else(|| DomainError::validation("file entry is not an object"))?;

        let field = |name: &'static str| -> Result<String, DomainError> {
            entry
                .get(name)
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
                .ok_or(DomainError::MissingField(name))
        };

        Ok(Self {
            path: field("path")?,
            content: field("content")?,
            file_type: field("file_type")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_entry() {
        let file = GeneratedFile::from_value(&json!({
            "path": "index.html",
            "content": "<html></html>",
            "file_type": "html"
        }))
        .unwrap();

        assert_eq!(file, GeneratedFile::new("index.html", "<html></html>", "html"));
    }

    #[test]
    fn test_missing_content_is_rejected() {
        let err = GeneratedFile::from_value(&json!({"path": "game.js", "file_type": "javascript"}))
            .unwrap_err();
        assert!(matches!(err, DomainError::MissingField("content")));
    }

    #[test]
    fn test_blank_file_type_is_rejected() {
        let err = GeneratedFile::from_value(&json!({
            "path": "style.css",
            "content": "body {}",
            "file_type": "  "
        }))
        .unwrap_err();
        assert!(matches!(err, DomainError::MissingField("file_type")));
    }

    #[test]
    fn test_non_object_entry_is_rejected() {
        let err = GeneratedFile::from_value(&json!("index.html")).unwrap_err();
        assert!(err.to_string().contains("not an object"));
    }
}
