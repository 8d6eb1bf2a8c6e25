//! External service port traits (LLM, embeddings, vector index, templates).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use specforge_domain::JsonObject;

use super::error::{EmbeddingError, LlmError, TemplateError, VectorIndexError};

// =============================================================================
// LLM Types
// =============================================================================

/// LLM request/response types
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    /// The conversation history
    pub messages: Vec<ChatMessage>,
    /// System prompt / context
    pub system_prompt: Option<String>,
    /// Temperature for response generation (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

impl LlmRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            system_prompt: None,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// A user turn in the conversation. The system prompt travels separately
/// in [`LlmRequest::system_prompt`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Response from the LLM
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// The generated text content
    pub content: String,
    /// Why generation stopped; `Length` means the output was cut off
    pub finish_reason: FinishReason,
}

impl LlmResponse {
    /// A plain completed response, mostly for tests and stubs.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            finish_reason: FinishReason::Stop,
        }
    }
}

/// Reason the generation finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    Unknown,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmPort: Send + Sync {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError>;
}

// =============================================================================
// Embeddings
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingPort: Send + Sync {
    /// Embed one text into a dense vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Length of the vectors produced by [`EmbeddingPort::embed`].
    fn dimension(&self) -> usize;
}

// =============================================================================
// Vector Index
// =============================================================================

/// Identifier of a stored point.
///
/// Numeric spec ids are stored as integers; anything else as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointId {
    Num(u64),
    Text(String),
}

impl PointId {
    pub fn parse(spec_id: &str) -> Self {
        match spec_id.trim().parse::<u64>() {
            Ok(n) => PointId::Num(n),
            Err(_) => PointId::Text(spec_id.to_string()),
        }
    }
}

impl std::fmt::Display for PointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PointId::Num(n) => write!(f, "{n}"),
            PointId::Text(s) => f.write_str(s),
        }
    }
}

/// A vector with its id and payload, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorPoint {
    pub id: PointId,
    pub vector: Vec<f32>,
    pub payload: JsonObject,
}

/// Nearest-neighbour query.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorQuery {
    pub vector: Vec<f32>,
    pub limit: usize,
    pub score_threshold: f32,
}

/// A search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPoint {
    pub id: PointId,
    pub score: f32,
    pub payload: JsonObject,
}

/// Collection lifecycle and point CRUD on the external vector index.
///
/// Implementations are bound to one collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorIndexPort: Send + Sync {
    /// Create the collection if it does not exist yet.
    ///
    /// Must tolerate another caller creating it concurrently.
    async fn ensure_collection(&self, dimension: usize) -> Result<(), VectorIndexError>;
    /// Drop (if present) and create the collection.
    async fn recreate_collection(&self, dimension: usize) -> Result<(), VectorIndexError>;
    async fn delete_collection(&self) -> Result<(), VectorIndexError>;
    async fn upsert(&self, point: VectorPoint) -> Result<(), VectorIndexError>;
    async fn search(&self, query: VectorQuery) -> Result<Vec<ScoredPoint>, VectorIndexError>;
    async fn delete_points(&self, ids: Vec<PointId>) -> Result<(), VectorIndexError>;
    fn collection_name(&self) -> &str;
}

// =============================================================================
// Prompt Templates
// =============================================================================

/// Supplies the spec-generation prompt template.
#[cfg_attr(test, mockall::automock)]
pub trait SpecTemplateSource: Send + Sync {
    fn load_spec_template(&self) -> Result<String, TemplateError>;
}
