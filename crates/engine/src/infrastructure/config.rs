//! Service configuration read from environment variables.

use std::path::PathBuf;

use super::embeddings::{DEFAULT_EMBEDDING_DIM, DEFAULT_EMBEDDING_MODEL, DEFAULT_EMBEDDING_URL};
use super::openai::{DEFAULT_LLM_TIMEOUT_SECS, DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};
use super::qdrant::{DEFAULT_COLLECTION_NAME, DEFAULT_QDRANT_URL};
use super::template_source::DEFAULT_SPEC_PROMPT_PATH;

pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 8000;

/// Everything the engine needs to wire its clients.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub server_host: String,
    pub server_port: u16,
    /// LLM credential. `None` keeps the server up but spec/code generation
    /// reports a configuration error.
    pub openai_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    pub qdrant_url: String,
    pub collection_name: String,
    pub embedding_url: String,
    pub embedding_model: String,
    pub embedding_dim: usize,
    pub embedding_api_key: Option<String>,
    pub spec_prompt_path: PathBuf,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let text = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        Self {
            server_host: text("SERVER_HOST", DEFAULT_SERVER_HOST),
            server_port: parse_or(
                "SERVER_PORT",
                get("SERVER_PORT").or_else(|| get("PORT")),
                DEFAULT_SERVER_PORT,
            ),
            openai_api_key: get("OPENAI_API_KEY"),
            llm_base_url: text("LLM_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            llm_model: text("LLM_MODEL", DEFAULT_OPENAI_MODEL),
            llm_timeout_secs: parse_or(
                "LLM_TIMEOUT_SECS",
                get("LLM_TIMEOUT_SECS"),
                DEFAULT_LLM_TIMEOUT_SECS,
            ),
            qdrant_url: text("QDRANT_URL", DEFAULT_QDRANT_URL),
            collection_name: text("COLLECTION_NAME", DEFAULT_COLLECTION_NAME),
            embedding_url: text("EMBEDDING_URL", DEFAULT_EMBEDDING_URL),
            embedding_model: text("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
            embedding_dim: parse_or("EMBEDDING_DIM", get("EMBEDDING_DIM"), DEFAULT_EMBEDDING_DIM),
            embedding_api_key: get("EMBEDDING_API_KEY"),
            spec_prompt_path: PathBuf::from(text("SPEC_PROMPT_PATH", DEFAULT_SPEC_PROMPT_PATH)),
        }
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match raw {
        None => default,
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %value, default = %default, "Invalid numeric setting, using default");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ServiceConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]);

        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.server_port, 8000);
        assert_eq!(config.openai_api_key, None);
        assert_eq!(config.llm_base_url, "https://api.openai.com");
        assert_eq!(config.llm_model, "gpt-4");
        assert_eq!(config.llm_timeout_secs, 120);
        assert_eq!(config.qdrant_url, "http://localhost:6333");
        assert_eq!(config.collection_name, "game_specs");
        assert_eq!(config.embedding_dim, 384);
        assert_eq!(
            config.spec_prompt_path,
            PathBuf::from("crates/engine/prompts/spec_prompt.txt")
        );
    }

    #[test]
    fn test_port_falls_back_to_port_variable() {
        let config = config_from(&[("PORT", "9100")]);
        assert_eq!(config.server_port, 9100);

        let config = config_from(&[("PORT", "9100"), ("SERVER_PORT", "9200")]);
        assert_eq!(config.server_port, 9200);
    }

    #[test]
    fn test_invalid_numbers_fall_back_to_defaults() {
        let config = config_from(&[("SERVER_PORT", "eighty"), ("EMBEDDING_DIM", "-3")]);

        assert_eq!(config.server_port, 8000);
        assert_eq!(config.embedding_dim, 384);
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let config = config_from(&[("OPENAI_API_KEY", "   ")]);
        assert!(config.openai_api_key.is_none());

        let config = config_from(&[("OPENAI_API_KEY", "sk-test")]);
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
    }
}
