//! SpecForge Shared - HTTP contracts.
//!
//! Wire-format DTOs for the engine's REST API. No business logic; the
//! engine converts between these and its use case types.

pub mod requests;
pub mod responses;

pub use requests::{
    GenerateCodeRequest, GenerateSpecRequest, OutputFormat, SearchRequest, UpsertRequest,
    DEFAULT_SCORE_THRESHOLD, DEFAULT_TOP_K,
};
pub use responses::{
    ErrorResponse, GenerateCodeResponse, GenerateSpecResponse, OkResponse, SearchResponse,
    SimilarItem, UpsertResponse,
};
