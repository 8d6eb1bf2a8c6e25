//! HTTP routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use std::sync::Arc;

use specforge_shared::{
    ErrorResponse, GenerateCodeRequest, GenerateCodeResponse, GenerateSpecRequest,
    GenerateSpecResponse, OkResponse, SearchRequest, SearchResponse, SimilarItem, UpsertRequest,
    UpsertResponse,
};

use crate::app::App;
use crate::use_cases::{SpecError, VectorError};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/llm/generate-spec", post(generate_spec))
        .route("/llm/generate-code", post(generate_code))
        .route("/vector/search", post(search))
        .route("/vector/upsert", post(upsert))
        .route("/vector/clear", delete(clear_collection))
        .route("/vector/collection", delete(recreate_collection))
        .route("/vector/spec/{spec_id}", delete(delete_spec))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Generation
// =============================================================================

async fn generate_spec(
    State(app): State<Arc<App>>,
    Json(request): Json<GenerateSpecRequest>,
) -> Result<Json<GenerateSpecResponse>, ApiError> {
    let result = app
        .use_cases
        .spec
        .generate(&request.brief, request.constraints.as_ref())
        .await?;

    Ok(Json(GenerateSpecResponse {
        title: result.title,
        spec_markdown: result.spec_markdown,
        spec_json: result.spec_json,
    }))
}

/// Always 200; failures are reported in the body.
async fn generate_code(
    State(app): State<Arc<App>>,
    Json(request): Json<GenerateCodeRequest>,
) -> Json<GenerateCodeResponse> {
    tracing::debug!(output_format = ?request.output_format, "Code generation requested");
    let result = app.use_cases.code.generate(request.game_spec).await;

    Json(GenerateCodeResponse {
        success: result.success,
        files: result.files,
        project_structure: result.project_structure,
        build_instructions: result.build_instructions,
        error: result.error,
    })
}

// =============================================================================
// Vector
// =============================================================================

async fn search(
    State(app): State<Arc<App>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let similar = app
        .use_cases
        .vector
        .search(&request.text, request.top_k, request.threshold)
        .await?
        .into_iter()
        .map(|hit| SimilarItem {
            spec_id: hit.spec_id,
            title: hit.title,
            score: hit.score,
        })
        .collect();

    Ok(Json(SearchResponse { similar }))
}

async fn upsert(
    State(app): State<Arc<App>>,
    Json(request): Json<UpsertRequest>,
) -> Result<Json<UpsertResponse>, ApiError> {
    app.use_cases
        .vector
        .upsert(&request.spec_id, &request.text, request.payload)
        .await?;

    Ok(Json(UpsertResponse {
        ok: true,
        id: request.spec_id,
    }))
}

async fn clear_collection(State(app): State<Arc<App>>) -> Result<Json<OkResponse>, ApiError> {
    let vector = &app.use_cases.vector;
    vector
        .clear()
        .await
        .map_err(|e| ApiError::Upstream(format!("Failed to clear collection: {e}")))?;

    Ok(Json(OkResponse::new(format!(
        "Collection '{}' cleared successfully",
        vector.collection_name()
    ))))
}

async fn recreate_collection(State(app): State<Arc<App>>) -> Result<Json<OkResponse>, ApiError> {
    let vector = &app.use_cases.vector;
    vector
        .recreate()
        .await
        .map_err(|e| ApiError::Upstream(format!("Failed to recreate collection: {e}")))?;

    Ok(Json(OkResponse::new(format!(
        "Collection '{}' recreated successfully",
        vector.collection_name()
    ))))
}

async fn delete_spec(
    State(app): State<Arc<App>>,
    Path(spec_id): Path<String>,
) -> Result<Json<OkResponse>, ApiError> {
    app.use_cases
        .vector
        .delete_spec(&spec_id)
        .await
        .map_err(|e| {
            ApiError::Upstream(format!("Failed to delete spec from vector database: {e}"))
        })?;

    Ok(Json(OkResponse::new(format!(
        "Spec '{spec_id}' deleted from vector database successfully"
    ))))
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
    /// A dependency (LLM, embeddings, Qdrant) failed. The message is passed through.
    Upstream(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, detail)
            }
            ApiError::Upstream(detail) => {
                tracing::error!(detail = %detail, "Upstream service failed");
                (StatusCode::INTERNAL_SERVER_ERROR, detail)
            }
        };
        (status, Json(ErrorResponse { detail })).into_response()
    }
}

impl From<SpecError> for ApiError {
    fn from(e: SpecError) -> Self {
        match e {
            SpecError::Validation(msg) => ApiError::BadRequest(msg),
            SpecError::Configuration(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<VectorError> for ApiError {
    fn from(e: VectorError) -> Self {
        match e {
            VectorError::Validation(msg) => ApiError::BadRequest(msg),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::infrastructure::ports::{
        LlmPort, LlmResponse, MockEmbeddingPort, MockLlmPort, MockSpecTemplateSource,
        MockVectorIndexPort, PointId, ScoredPoint, VectorIndexError,
    };
    use crate::prompt_templates::PromptTemplates;

    struct Mocks {
        llm: Option<MockLlmPort>,
        embeddings: MockEmbeddingPort,
        index: MockVectorIndexPort,
    }

    impl Mocks {
        fn new() -> Self {
            let mut embeddings = MockEmbeddingPort::new();
            embeddings.expect_dimension().return_const(384usize);
            embeddings
                .expect_embed()
                .returning(|_| Ok(vec![0.0; 384]));
            let mut index = MockVectorIndexPort::new();
            index
                .expect_collection_name()
                .return_const("game_specs".to_string());
            Self {
                llm: None,
                embeddings,
                index,
            }
        }

        fn with_llm_content(mut self, content: &'static str) -> Self {
            let mut llm = MockLlmPort::new();
            llm.expect_generate()
                .returning(move |_| Ok(LlmResponse::text(content)));
            self.llm = Some(llm);
            self
        }

        fn router(self) -> Router {
            let mut source = MockSpecTemplateSource::new();
            source
                .expect_load_spec_template()
                .returning(|| Ok("Design {GAME_NAME}: {BRIEF}".to_string()));
            let llm = self.llm.map(|llm| Arc::new(llm) as Arc<dyn LlmPort>);
            let app = App::new(
                llm,
                Arc::new(self.embeddings),
                Arc::new(self.index),
                Arc::new(source),
                PromptTemplates::default(),
            );
            routes().with_state(Arc::new(app))
        }
    }

    async fn send(
        router: Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let router = Mocks::new().router();
        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_generate_spec_returns_rendered_document() {
        let router = Mocks::new()
            .with_llm_content(r#"{"title": "Gem Match", "description": "Swap gems.", "genre": "puzzle"}"#)
            .router();

        let (status, body) = send(
            router,
            "POST",
            "/llm/generate-spec",
            Some(json!({"brief": "A puzzle game about matching gems."})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Gem Match");
        assert!(body["spec_markdown"]
            .as_str()
            .unwrap()
            .starts_with("# Gem Match"));
        assert_eq!(body["spec_json"]["genre"], "puzzle");
    }

    #[tokio::test]
    async fn test_generate_spec_empty_brief_is_bad_request() {
        let router = Mocks::new().with_llm_content("{}").router();

        let (status, body) =
            send(router, "POST", "/llm/generate-spec", Some(json!({"brief": ""}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "brief is required");
    }

    #[tokio::test]
    async fn test_generate_spec_without_credential_is_server_error() {
        let router = Mocks::new().router();

        let (status, body) = send(
            router,
            "POST",
            "/llm/generate-spec",
            Some(json!({"brief": "Space racer"})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "OpenAI API key not configured");
    }

    #[tokio::test]
    async fn test_generate_code_failure_is_still_ok_status() {
        let router = Mocks::new().with_llm_content(r#"{"success": true}"#).router();

        let (status, body) = send(
            router,
            "POST",
            "/llm/generate-code",
            Some(json!({"game_spec": {"title": "Gem Match"}, "output_format": "zip"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["files"], json!([]));
        assert!(!body["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_applies_request_defaults() {
        let mut mocks = Mocks::new();
        mocks.index.expect_ensure_collection().returning(|_| Ok(()));
        mocks
            .index
            .expect_search()
            .withf(|query| query.limit == 5 && query.score_threshold == 0.86)
            .returning(|_| {
                let mut payload = serde_json::Map::new();
                payload.insert("title".to_string(), json!("Gem Match"));
                Ok(vec![ScoredPoint {
                    id: PointId::Num(42),
                    score: 0.91,
                    payload,
                }])
            });

        let (status, body) = send(
            mocks.router(),
            "POST",
            "/vector/search",
            Some(json!({"text": "gem puzzle"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["similar"][0]["spec_id"], "42");
        assert_eq!(body["similar"][0]["title"], "Gem Match");
    }

    #[tokio::test]
    async fn test_upsert_echoes_id() {
        let mut mocks = Mocks::new();
        mocks.index.expect_ensure_collection().returning(|_| Ok(()));
        mocks.index.expect_upsert().times(1).returning(|_| Ok(()));

        let (status, body) = send(
            mocks.router(),
            "POST",
            "/vector/upsert",
            Some(json!({"spec_id": "42", "text": "space shooter", "payload": {"title": "Orbit"}})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true, "id": "42"}));
    }

    #[tokio::test]
    async fn test_clear_reports_collection_name() {
        let mut mocks = Mocks::new();
        mocks.index.expect_delete_collection().returning(|| Ok(()));
        mocks.index.expect_ensure_collection().returning(|_| Ok(()));

        let (status, body) = send(mocks.router(), "DELETE", "/vector/clear", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["message"], "Collection 'game_specs' cleared successfully");
    }

    #[tokio::test]
    async fn test_recreate_failure_includes_upstream_message() {
        let mut mocks = Mocks::new();
        mocks.index.expect_recreate_collection().returning(|_| {
            Err(VectorIndexError::request("create_collection", "connection refused"))
        });

        let (status, body) = send(mocks.router(), "DELETE", "/vector/collection", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.starts_with("Failed to recreate collection: "));
        assert!(detail.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_delete_spec_uses_path_id() {
        let mut mocks = Mocks::new();
        mocks
            .index
            .expect_delete_points()
            .withf(|ids| ids == &vec![PointId::Num(7)])
            .times(1)
            .returning(|_| Ok(()));

        let (status, body) = send(mocks.router(), "DELETE", "/vector/spec/7", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["message"],
            "Spec '7' deleted from vector database successfully"
        );
    }
}
