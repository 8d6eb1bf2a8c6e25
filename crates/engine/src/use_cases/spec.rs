//! Spec generation: brief -> prompt -> LLM -> extraction -> markdown.

use std::sync::Arc;

use specforge_domain::{JsonObject, SpecDocument};

use crate::infrastructure::ports::{ChatMessage, FinishReason, LlmPort, LlmRequest};
use crate::use_cases::extraction::{extract_spec, preview, SpecExtraction};
use crate::use_cases::prompt_builder::PromptBuilder;
use crate::use_cases::rendering::render_markdown_titled;

const SPEC_TEMPERATURE: f32 = 0.7;
const SPEC_MAX_TOKENS: u32 = 3000;

/// Characters of the brief used as the title of a degraded result.
const DEGRADED_TITLE_CHARS: usize = 50;

/// Errors reported to the caller. LLM-side failures never surface here;
/// they produce a degraded result instead.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Configuration(String),
}

/// A generated (or degraded) specification.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecResult {
    pub title: String,
    pub spec_markdown: String,
    pub spec_json: SpecDocument,
}

impl SpecResult {
    /// Result built from the brief alone when the LLM output is unusable.
    pub fn degraded(brief: &str) -> Self {
        let title: String = brief.chars().take(DEGRADED_TITLE_CHARS).collect();
        let spec_markdown = format!(
            "# {title}\n\n**Brief:** {brief}\n\n*Note: Error occurred during generation, using fallback response.*"
        );
        Self {
            title,
            spec_markdown,
            spec_json: SpecDocument::default(),
        }
    }
}

pub struct SpecService {
    llm: Option<Arc<dyn LlmPort>>,
    prompts: Arc<PromptBuilder>,
}

impl SpecService {
    pub fn new(llm: Option<Arc<dyn LlmPort>>, prompts: Arc<PromptBuilder>) -> Self {
        Self { llm, prompts }
    }

    pub async fn generate(
        &self,
        brief: &str,
        constraints: Option<&JsonObject>,
    ) -> Result<SpecResult, SpecError> {
        if brief.trim().is_empty() {
            return Err(SpecError::Validation("brief is required".to_string()));
        }
        let Some(llm) = &self.llm else {
            return Err(SpecError::Configuration(
                "OpenAI API key not configured".to_string(),
            ));
        };

        let prompt = self.prompts.build_spec_prompt(brief, constraints);
        let request = LlmRequest::new(vec![ChatMessage::user(prompt.user)])
            .with_system_prompt(prompt.system)
            .with_temperature(SPEC_TEMPERATURE)
            .with_max_tokens(Some(SPEC_MAX_TOKENS));

        let content = match llm.generate(request).await {
            Ok(response) => {
                if response.finish_reason == FinishReason::Length {
                    tracing::warn!(
                        max_tokens = SPEC_MAX_TOKENS,
                        "Spec response hit the token limit and may be truncated"
                    );
                }
                response.content
            }
            Err(e) => {
                tracing::warn!(error = %e, "Spec generation LLM call failed, using fallback");
                return Ok(SpecResult::degraded(brief));
            }
        };

        let extraction = match extract_spec(&content) {
            Ok(extraction) => extraction,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    response_preview = %preview(&content),
                    "Could not extract spec from LLM response, using fallback"
                );
                return Ok(SpecResult::degraded(brief));
            }
        };

        let (json, markdown) = match extraction {
            SpecExtraction::Combined { markdown, json } => (json, markdown),
            SpecExtraction::Document(json) => (json, String::new()),
            SpecExtraction::Trailing { prose, json } => (json, prose),
        };
        let spec_json = SpecDocument::from_object(json);

        let title = spec_json
            .display_title()
            .map(str::to_string)
            .unwrap_or(prompt.game_name);

        // Rendered with the same title the result reports.
        let spec_markdown = if markdown.trim().is_empty() {
            render_markdown_titled(&spec_json, &title)
        } else {
            markdown
        };

        tracing::info!(
            title = %title,
            markdown_len = spec_markdown.len(),
            "Generated game spec"
        );

        Ok(SpecResult {
            title,
            spec_markdown,
            spec_json,
        })
    }
}
