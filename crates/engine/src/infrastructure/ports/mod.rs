//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - LLM calls (could swap OpenAI -> Ollama or any OpenAI-compatible server)
//! - Embeddings (could swap the embedding server)
//! - Vector index (could swap Qdrant -> other)
//! - Prompt templates (file on disk, or fixed text in tests)

mod error;
mod external;

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{
    ChatMessage, EmbeddingPort, FinishReason, LlmPort, LlmRequest, LlmResponse, PointId,
    ScoredPoint, SpecTemplateSource, VectorIndexPort, VectorPoint, VectorQuery,
};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::{
    MockEmbeddingPort, MockLlmPort, MockSpecTemplateSource, MockVectorIndexPort,
};

// =============================================================================
// Error Types
// =============================================================================
pub use error::{EmbeddingError, LlmError, TemplateError, VectorIndexError};
