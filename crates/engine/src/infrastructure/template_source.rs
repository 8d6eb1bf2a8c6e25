//! File-backed prompt template source.

use std::path::PathBuf;

use crate::infrastructure::ports::{SpecTemplateSource, TemplateError};

/// Relative to the working directory; the binary is normally run from the repo root.
pub const DEFAULT_SPEC_PROMPT_PATH: &str = "crates/engine/prompts/spec_prompt.txt";

/// Reads the spec prompt template from disk on every request, so edits to
/// the file take effect without a restart.
#[derive(Debug, Clone)]
pub struct FileTemplateSource {
    path: PathBuf,
}

impl FileTemplateSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SpecTemplateSource for FileTemplateSource {
    fn load_spec_template(&self) -> Result<String, TemplateError> {
        let path = self.path.display().to_string();
        let content = std::fs::read_to_string(&self.path).map_err(|e| TemplateError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?;

        if content.trim().is_empty() {
            return Err(TemplateError::Empty { path });
        }
        Ok(content)
    }
}
