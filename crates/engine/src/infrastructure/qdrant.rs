//! Qdrant vector index client (REST API)
//!
//! Implements [`VectorIndexPort`] against one collection. Vectors are stored
//! with cosine distance.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use specforge_domain::JsonObject;
use std::time::Duration;

use crate::infrastructure::ports::{
    PointId, ScoredPoint, VectorIndexError, VectorIndexPort, VectorPoint, VectorQuery,
};

pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6333";
pub const DEFAULT_COLLECTION_NAME: &str = "game_specs";

#[derive(Clone)]
pub struct QdrantClient {
    client: Client,
    base_url: String,
    collection: String,
}

impl QdrantClient {
    pub fn new(base_url: &str, collection: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.base_url, self.collection)
    }

    async fn collection_exists(&self) -> Result<bool, VectorIndexError> {
        const OP: &str = "list_collections";
        let response = self
            .client
            .get(format!("{}/collections", self.base_url))
            .send()
            .await
            .map_err(|e| VectorIndexError::request(OP, e))?;
        let response = check_status(OP, response).await?;

        let listing: QdrantEnvelope<CollectionList> = response
            .json()
            .await
            .map_err(|e| VectorIndexError::invalid(OP, e))?;
        Ok(listing
            .result
            .collections
            .iter()
            .any(|c| c.name == self.collection))
    }

    async fn create_collection(&self, dimension: usize) -> Result<(), VectorIndexError> {
        const OP: &str = "create_collection";
        let response = self
            .client
            .put(self.collection_url())
            .json(&create_collection_body(dimension))
            .send()
            .await
            .map_err(|e| VectorIndexError::request(OP, e))?;

        // Another caller created it between our check and our create.
        if response.status() == StatusCode::CONFLICT {
            tracing::debug!(collection = %self.collection, "Collection already created concurrently");
            return Ok(());
        }
        check_status(OP, response).await?;
        tracing::info!(collection = %self.collection, dimension, "Created vector collection");
        Ok(())
    }
}

#[async_trait]
impl VectorIndexPort for QdrantClient {
    async fn ensure_collection(&self, dimension: usize) -> Result<(), VectorIndexError> {
        if self.collection_exists().await? {
            return Ok(());
        }
        self.create_collection(dimension).await
    }

    async fn recreate_collection(&self, dimension: usize) -> Result<(), VectorIndexError> {
        self.delete_collection().await?;
        self.create_collection(dimension).await
    }

    async fn delete_collection(&self) -> Result<(), VectorIndexError> {
        const OP: &str = "delete_collection";
        let response = self
            .client
            .delete(self.collection_url())
            .send()
            .await
            .map_err(|e| VectorIndexError::request(OP, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        check_status(OP, response).await?;
        Ok(())
    }

    async fn upsert(&self, point: VectorPoint) -> Result<(), VectorIndexError> {
        const OP: &str = "upsert";
        let response = self
            .client
            .put(format!("{}/points?wait=true", self.collection_url()))
            .json(&upsert_body(&point))
            .send()
            .await
            .map_err(|e| VectorIndexError::request(OP, e))?;
        check_status(OP, response).await?;
        Ok(())
    }

    async fn search(&self, query: VectorQuery) -> Result<Vec<ScoredPoint>, VectorIndexError> {
        const OP: &str = "search";
        let response = self
            .client
            .post(format!("{}/points/search", self.collection_url()))
            .json(&search_body(&query))
            .send()
            .await
            .map_err(|e| VectorIndexError::request(OP, e))?;
        let response = check_status(OP, response).await?;

        let hits: QdrantEnvelope<Vec<QdrantHit>> = response
            .json()
            .await
            .map_err(|e| VectorIndexError::invalid(OP, e))?;

        Ok(hits
            .result
            .into_iter()
            .map(|hit| ScoredPoint {
                id: hit.id,
                score: hit.score,
                payload: hit.payload.unwrap_or_default(),
            })
            .collect())
    }

    async fn delete_points(&self, ids: Vec<PointId>) -> Result<(), VectorIndexError> {
        const OP: &str = "delete_points";
        let response = self
            .client
            .post(format!("{}/points/delete?wait=true", self.collection_url()))
            .json(&json!({ "points": ids }))
            .send()
            .await
            .map_err(|e| VectorIndexError::request(OP, e))?;
        check_status(OP, response).await?;
        Ok(())
    }

    fn collection_name(&self) -> &str {
        &self.collection
    }
}

async fn check_status(
    operation: &'static str,
    response: Response,
) -> Result<Response, VectorIndexError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(VectorIndexError::Status {
        operation,
        status: status.as_u16(),
        body,
    })
}

fn create_collection_body(dimension: usize) -> Value {
    json!({
        "vectors": {
            "size": dimension,
            "distance": "Cosine"
        }
    })
}

fn upsert_body(point: &VectorPoint) -> Value {
    json!({
        "points": [{
            "id": point.id,
            "vector": point.vector,
            "payload": point.payload,
        }]
    })
}

fn search_body(query: &VectorQuery) -> Value {
    json!({
        "vector": query.vector,
        "limit": query.limit,
        "with_payload": true,
        "score_threshold": query.score_threshold,
    })
}

// =============================================================================
// Qdrant API types
// =============================================================================

#[derive(Debug, Deserialize)]
struct QdrantEnvelope<T> {
    result: T,
}

#[derive(Debug, Deserialize)]
struct CollectionList {
    #[serde(default)]
    collections: Vec<CollectionDescription>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CollectionDescription {
    name: String,
}

#[derive(Debug, Deserialize)]
struct QdrantHit {
    id: PointId,
    score: f32,
    #[serde(default)]
    payload: Option<JsonObject>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_spec_id_is_sent_as_number() {
        let point = VectorPoint {
            id: PointId::parse("42"),
            vector: vec![0.1, 0.2],
            payload: JsonObject::new(),
        };

        let body = upsert_body(&point);
        assert_eq!(body["points"][0]["id"], json!(42));
    }

    #[test]
    fn test_uuid_spec_id_is_sent_as_string() {
        let uuid = "3f2b6c1e-8a4d-4c6e-9b1a-2d7e5f8c9a01";
        let point = VectorPoint {
            id: PointId::parse(uuid),
            vector: vec![0.1],
            payload: JsonObject::new(),
        };

        let body = upsert_body(&point);
        assert_eq!(body["points"][0]["id"], json!(uuid));
    }

    #[test]
    fn test_search_body_carries_threshold_and_payload_flag() {
        let body = search_body(&VectorQuery {
            vector: vec![1.0, 0.0],
            limit: 5,
            score_threshold: 0.5,
        });

        assert_eq!(body["limit"], json!(5));
        assert_eq!(body["with_payload"], json!(true));
        assert_eq!(body["score_threshold"], json!(0.5));
    }

    #[test]
    fn test_create_collection_uses_cosine_distance() {
        let body = create_collection_body(384);
        assert_eq!(body["vectors"]["size"], json!(384));
        assert_eq!(body["vectors"]["distance"], json!("Cosine"));
    }

    #[test]
    fn test_search_hits_decode_both_id_kinds() {
        let raw = json!({
            "result": [
                {"id": 7, "score": 0.91, "payload": {"title": "Gem Match"}},
                {"id": "3f2b6c1e-8a4d-4c6e-9b1a-2d7e5f8c9a01", "score": 0.88}
            ],
            "status": "ok",
            "time": 0.001
        });

        let hits: QdrantEnvelope<Vec<QdrantHit>> = serde_json::from_value(raw).unwrap();

        assert_eq!(hits.result[0].id, PointId::Num(7));
        assert_eq!(
            hits.result[1].id,
            PointId::Text("3f2b6c1e-8a4d-4c6e-9b1a-2d7e5f8c9a01".to_string())
        );
        assert!(hits.result[1].payload.is_none());
    }
}
