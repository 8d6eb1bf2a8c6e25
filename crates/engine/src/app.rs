//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::ports::{EmbeddingPort, LlmPort, SpecTemplateSource, VectorIndexPort};
use crate::prompt_templates::PromptTemplates;
use crate::use_cases::{CodeService, PromptBuilder, SpecService, VectorService};

/// Main application state.
///
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub spec: Arc<SpecService>,
    pub code: Arc<CodeService>,
    pub vector: Arc<VectorService>,
}

impl App {
    /// Wire the use cases over their ports.
    ///
    /// `llm` is `None` when no credential is configured; the spec and code
    /// endpoints then report the missing configuration per request.
    pub fn new(
        llm: Option<Arc<dyn LlmPort>>,
        embeddings: Arc<dyn EmbeddingPort>,
        index: Arc<dyn VectorIndexPort>,
        template_source: Arc<dyn SpecTemplateSource>,
        templates: PromptTemplates,
    ) -> Self {
        let prompts = Arc::new(PromptBuilder::new(template_source, templates));

        let use_cases = UseCases {
            spec: Arc::new(SpecService::new(llm.clone(), prompts.clone())),
            code: Arc::new(CodeService::new(llm, prompts)),
            vector: Arc::new(VectorService::new(embeddings, index)),
        };

        Self { use_cases }
    }
}
