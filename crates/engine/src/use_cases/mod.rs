//! Use cases - request orchestration over the ports.
//!
//! `spec`, `code` and `vector` are the three services behind the HTTP API.
//! `extraction`, `rendering` and `prompt_builder` are the pure pieces the
//! spec and code pipelines share.

pub mod code;
pub mod extraction;
pub mod prompt_builder;
pub mod rendering;
pub mod spec;
pub mod vector;

pub use code::{CodeResult, CodeService};
pub use prompt_builder::PromptBuilder;
pub use spec::{SpecError, SpecResult, SpecService};
pub use vector::{SimilarSpec, VectorError, VectorService};
