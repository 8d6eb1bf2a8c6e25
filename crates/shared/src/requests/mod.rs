//! Request bodies for the HTTP API.

mod generation;
mod vector;

pub use generation::{GenerateCodeRequest, GenerateSpecRequest, OutputFormat};
pub use vector::{SearchRequest, UpsertRequest, DEFAULT_SCORE_THRESHOLD, DEFAULT_TOP_K};
