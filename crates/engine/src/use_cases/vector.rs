//! Similarity search and collection lifecycle over the vector index.

use std::sync::Arc;

use serde_json::Value;
use specforge_domain::JsonObject;

use crate::infrastructure::ports::{
    EmbeddingError, EmbeddingPort, PointId, VectorIndexError, VectorIndexPort, VectorPoint,
    VectorQuery,
};

#[derive(Debug, thiserror::Error)]
pub enum VectorError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
    #[error(transparent)]
    Index(#[from] VectorIndexError),
}

/// One similar spec found by [`VectorService::search`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarSpec {
    pub spec_id: String,
    pub title: String,
    pub score: f32,
}

pub struct VectorService {
    embeddings: Arc<dyn EmbeddingPort>,
    index: Arc<dyn VectorIndexPort>,
}

impl VectorService {
    pub fn new(embeddings: Arc<dyn EmbeddingPort>, index: Arc<dyn VectorIndexPort>) -> Self {
        Self { embeddings, index }
    }

    pub fn collection_name(&self) -> &str {
        self.index.collection_name()
    }

    /// Create the collection if absent.
    pub async fn ensure_collection(&self) -> Result<(), VectorError> {
        self.index
            .ensure_collection(self.embeddings.dimension())
            .await?;
        Ok(())
    }

    pub async fn search(
        &self,
        text: &str,
        top_k: usize,
        threshold: f32,
    ) -> Result<Vec<SimilarSpec>, VectorError> {
        if text.trim().is_empty() {
            return Err(VectorError::Validation("text is required".to_string()));
        }
        self.ensure_collection().await?;

        let vector = self.embeddings.embed(text).await?;
        let hits = self
            .index
            .search(VectorQuery {
                vector,
                limit: top_k,
                score_threshold: threshold,
            })
            .await?;

        tracing::debug!(hits = hits.len(), top_k, threshold, "Vector search complete");

        Ok(hits
            .into_iter()
            .map(|hit| SimilarSpec {
                spec_id: hit.id.to_string(),
                title: hit
                    .payload
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                score: hit.score,
            })
            .collect())
    }

    pub async fn upsert(
        &self,
        spec_id: &str,
        text: &str,
        payload: JsonObject,
    ) -> Result<(), VectorError> {
        if spec_id.trim().is_empty() {
            return Err(VectorError::Validation("spec_id is required".to_string()));
        }
        self.ensure_collection().await?;

        let vector = self.embeddings.embed(text).await?;
        self.index
            .upsert(VectorPoint {
                id: PointId::parse(spec_id),
                vector,
                payload,
            })
            .await?;

        tracing::info!(spec_id, "Upserted spec embedding");
        Ok(())
    }

    /// Delete the collection and create it again empty.
    pub async fn clear(&self) -> Result<(), VectorError> {
        self.index.delete_collection().await?;
        self.ensure_collection().await?;
        tracing::info!(collection = self.collection_name(), "Cleared vector collection");
        Ok(())
    }

    /// Drop and create the collection with the configured dimension.
    pub async fn recreate(&self) -> Result<(), VectorError> {
        self.index
            .recreate_collection(self.embeddings.dimension())
            .await?;
        tracing::info!(collection = self.collection_name(), "Recreated vector collection");
        Ok(())
    }

    pub async fn delete_spec(&self, spec_id: &str) -> Result<(), VectorError> {
        self.index
            .delete_points(vec![PointId::parse(spec_id)])
            .await?;
        tracing::info!(spec_id, "Deleted spec embedding");
        Ok(())
    }
}
