//! Embedding client for OpenAI-compatible `/v1/embeddings` servers.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::infrastructure::ports::{EmbeddingError, EmbeddingPort};

pub const DEFAULT_EMBEDDING_URL: &str = "http://localhost:11434";
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

#[derive(Clone)]
pub struct HttpEmbeddingClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    dimension: usize,
}

impl HttpEmbeddingClient {
    pub fn new(base_url: &str, model: &str, dimension: usize, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
            dimension,
        }
    }
}

#[async_trait]
impl EmbeddingPort for HttpEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let body = EmbeddingRequest {
            model: &self.model,
            input: text,
        };

        let mut builder = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url))
            .json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| EmbeddingError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(EmbeddingError::RequestFailed(format!(
                "{status}: {error_text}"
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

        first_vector(parsed, self.dimension)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

fn first_vector(response: EmbeddingResponse, dimension: usize) -> Result<Vec<f32>, EmbeddingError> {
    let vector = response
        .data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .ok_or_else(|| EmbeddingError::InvalidResponse("No embedding in response".to_string()))?;

    if vector.len() != dimension {
        return Err(EmbeddingError::InvalidResponse(format!(
            "expected {dimension} dimensions, got {}",
            vector.len()
        )));
    }
    Ok(vector)
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(vectors: serde_json::Value) -> EmbeddingResponse {
        serde_json::from_value(vectors).unwrap()
    }

    #[test]
    fn test_first_vector_is_returned() {
        let parsed = response(serde_json::json!({
            "data": [{"embedding": [0.5, 0.25, 1.0]}, {"embedding": [9.0, 9.0, 9.0]}]
        }));

        assert_eq!(first_vector(parsed, 3).unwrap(), vec![0.5, 0.25, 1.0]);
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let parsed = response(serde_json::json!({"data": [{"embedding": [0.5, 0.25]}]}));

        let err = first_vector(parsed, 384).unwrap_err();
        assert!(err.to_string().contains("expected 384 dimensions, got 2"));
    }

    #[test]
    fn test_empty_data_is_invalid() {
        let parsed = response(serde_json::json!({"data": []}));
        assert!(matches!(
            first_vector(parsed, 3),
            Err(EmbeddingError::InvalidResponse(_))
        ));
    }
}
