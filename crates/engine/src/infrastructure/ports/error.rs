//! Error types for port operations.

#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum EmbeddingError {
    #[error("Embedding request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid embedding response: {0}")]
    InvalidResponse(String),
}

/// Vector index operation errors with the upstream detail preserved.
#[derive(Debug, Clone, thiserror::Error)]
pub enum VectorIndexError {
    /// Transport-level failure (connection refused, timeout).
    #[error("Vector index request failed in {operation}: {message}")]
    RequestFailed {
        operation: &'static str,
        message: String,
    },

    /// The index answered with a non-success status.
    #[error("Vector index returned {status} in {operation}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// The index answered 2xx but the body could not be decoded.
    #[error("Invalid vector index response in {operation}: {message}")]
    InvalidResponse {
        operation: &'static str,
        message: String,
    },
}

impl VectorIndexError {
    pub fn request(operation: &'static str, message: impl ToString) -> Self {
        Self::RequestFailed {
            operation,
            message: message.to_string(),
        }
    }

    pub fn invalid(operation: &'static str, message: impl ToString) -> Self {
        Self::InvalidResponse {
            operation,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Failed to read template {path}: {message}")]
    Io { path: String, message: String },
    #[error("Template {path} is empty")]
    Empty { path: String },
}
