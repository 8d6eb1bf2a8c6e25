use serde::{Deserialize, Serialize};
use specforge_domain::JsonObject;

/// Default number of neighbours returned by a similarity search.
pub const DEFAULT_TOP_K: usize = 5;

/// Default minimum cosine score for a search hit.
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.86;

/// Body of `POST /vector/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub text: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

/// Body of `POST /vector/upsert`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertRequest {
    pub spec_id: String,
    pub text: String,
    /// Stored alongside the vector; `title` is what searches report back.
    #[serde(default)]
    pub payload: JsonObject,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_threshold() -> f32 {
    DEFAULT_SCORE_THRESHOLD
}
