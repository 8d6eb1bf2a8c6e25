//! SpecForge Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use specforge_engine::api;
use specforge_engine::app::App;
use specforge_engine::infrastructure::{
    config::ServiceConfig,
    embeddings::HttpEmbeddingClient,
    openai::OpenAiClient,
    ports::LlmPort,
    qdrant::QdrantClient,
    template_source::FileTemplateSource,
};
use specforge_engine::prompt_templates::PromptTemplates;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Repo root first, then the working directory. Earlier files win.
    load_dotenv_from_repo_root();
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "specforge_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting SpecForge Engine");

    let config = ServiceConfig::from_env();

    let llm: Option<Arc<dyn LlmPort>> = match &config.openai_api_key {
        Some(api_key) => {
            tracing::info!(
                base_url = %config.llm_base_url,
                model = %config.llm_model,
                timeout_secs = config.llm_timeout_secs,
                "LLM client configured"
            );
            Some(Arc::new(OpenAiClient::with_timeout(
                &config.llm_base_url,
                api_key,
                &config.llm_model,
                config.llm_timeout_secs,
            )))
        }
        None => {
            tracing::warn!("OPENAI_API_KEY not set; spec and code generation will be unavailable");
            None
        }
    };

    let embeddings = Arc::new(HttpEmbeddingClient::new(
        &config.embedding_url,
        &config.embedding_model,
        config.embedding_dim,
        config.embedding_api_key.clone(),
    ));
    let index = Arc::new(QdrantClient::new(&config.qdrant_url, &config.collection_name));
    let template_source = Arc::new(FileTemplateSource::new(config.spec_prompt_path.clone()));

    let app = Arc::new(App::new(
        llm,
        embeddings,
        index,
        template_source,
        PromptTemplates::from_env(),
    ));

    tracing::info!(
        qdrant_url = %config.qdrant_url,
        collection = %config.collection_name,
        dimension = config.embedding_dim,
        "Ensuring vector collection"
    );
    if let Err(e) = app.use_cases.vector.ensure_collection().await {
        tracing::warn!(error = %e, "Could not ensure vector collection at startup");
    }

    let mut router = api::http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer_from_env() {
        router = router.layer(cors);
    }

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer_from_env() -> Option<CorsLayer> {
    let allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())?;

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        return Some(cors.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();

    if origins.is_empty() {
        tracing::warn!(value = %allowed_origins, "CORS_ALLOWED_ORIGINS has no valid origins, CORS disabled");
        return None;
    }

    Some(cors.allow_origin(origins))
}
