//! Code generation: spec -> prompt -> LLM -> file list.
//!
//! Every failure is soft: the caller always gets a [`CodeResult`], with
//! `success: false` and an error message when anything goes wrong.

use std::sync::Arc;

use serde_json::Value;
use specforge_domain::{DomainError, GeneratedFile, JsonObject, SpecDocument};

use crate::infrastructure::ports::{ChatMessage, FinishReason, LlmError, LlmPort, LlmRequest};
use crate::use_cases::extraction::{extract, preview, ExtractionFailure};
use crate::use_cases::prompt_builder::PromptBuilder;

const CODE_TEMPERATURE: f32 = 0.3;
const CODE_MAX_TOKENS: u32 = 4000;

pub const DEFAULT_BUILD_INSTRUCTIONS: &str = "Open index.html in any modern web browser to play";

#[derive(Debug, Clone, PartialEq)]
pub struct CodeResult {
    pub success: bool,
    pub files: Vec<GeneratedFile>,
    pub project_structure: JsonObject,
    pub build_instructions: String,
    pub error: Option<String>,
}

impl CodeResult {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            files: Vec::new(),
            project_structure: JsonObject::new(),
            build_instructions: String::new(),
            error: Some(error.into()),
        }
    }
}

/// Reasons code generation fails. Turned into [`CodeResult::failure`] messages.
#[derive(Debug, thiserror::Error)]
enum CodeGenError {
    #[error("game_spec is required")]
    MissingSpec,
    #[error("OpenAI API key not configured")]
    NotConfigured,
    #[error("OpenAI API call failed: {0}")]
    Llm(#[from] LlmError),
    #[error("Empty response from OpenAI API - check API key and credits")]
    EmptyResponse,
    #[error("Failed to parse LLM response: {0}")]
    Extraction(#[from] ExtractionFailure),
    #[error("Code generation failed: Invalid response structure")]
    NotSuccessful,
    #[error("Code generation failed: No files generated")]
    NoFiles,
    #[error("Code generation failed: {0}")]
    InvalidFile(#[from] DomainError),
}

pub struct CodeService {
    llm: Option<Arc<dyn LlmPort>>,
    prompts: Arc<PromptBuilder>,
}

impl CodeService {
    pub fn new(llm: Option<Arc<dyn LlmPort>>, prompts: Arc<PromptBuilder>) -> Self {
        Self { llm, prompts }
    }

    pub async fn generate(&self, game_spec: JsonObject) -> CodeResult {
        match self.try_generate(game_spec).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "Code generation failed");
                CodeResult::failure(e.to_string())
            }
        }
    }

    async fn try_generate(&self, game_spec: JsonObject) -> Result<CodeResult, CodeGenError> {
        if game_spec.is_empty() {
            return Err(CodeGenError::MissingSpec);
        }
        let llm = self.llm.as_ref().ok_or(CodeGenError::NotConfigured)?;

        let spec = SpecDocument::from_object(game_spec);
        let prompt = self.prompts.build_code_prompt(&spec);
        tracing::debug!(prompt_len = prompt.user.len(), "Built code generation prompt");

        let request = LlmRequest::new(vec![ChatMessage::user(prompt.user)])
            .with_system_prompt(prompt.system)
            .with_temperature(CODE_TEMPERATURE)
            .with_max_tokens(Some(CODE_MAX_TOKENS));

        let response = llm.generate(request).await?;
        if response.finish_reason == FinishReason::Length {
            tracing::warn!(
                max_tokens = CODE_MAX_TOKENS,
                "Code response hit the token limit and may be truncated"
            );
        }
        let content = response.content.trim();
        if content.is_empty() {
            return Err(CodeGenError::EmptyResponse);
        }
        tracing::debug!(
            response_len = content.len(),
            response_preview = %preview(content),
            "Received code generation response"
        );

        let parsed = extract(content)?;
        let result = validate_output(parsed)?;
        tracing::info!(files = result.files.len(), "Generated game code");
        Ok(result)
    }
}

/// Check the extracted object and convert it into a successful result.
///
/// One bad file entry rejects the whole list.
fn validate_output(mut parsed: JsonObject) -> Result<CodeResult, CodeGenError> {
    if !parsed.get("success").is_some_and(is_truthy) {
        return Err(CodeGenError::NotSuccessful);
    }

    let entries = match parsed.get("files") {
        Some(Value::Array(entries)) if !entries.is_empty() => entries,
        _ => return Err(CodeGenError::NoFiles),
    };
    let files = entries
        .iter()
        .map(GeneratedFile::from_value)
        .collect::<Result<Vec<_>, _>>()?;

    let project_structure = match parsed.remove("project_structure") {
        Some(Value::Object(structure)) => structure,
        _ => JsonObject::new(),
    };
    let build_instructions = match parsed.remove("build_instructions") {
        Some(Value::String(text)) if !text.trim().is_empty() => text,
        _ => DEFAULT_BUILD_INSTRUCTIONS.to_string(),
    };

    Ok(CodeResult {
        success: true,
        files,
        project_structure,
        build_instructions,
        error: None,
    })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
