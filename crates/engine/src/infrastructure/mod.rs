//! Infrastructure: configuration, port traits and their HTTP/file adapters.

pub mod config;
pub mod embeddings;
pub mod openai;
pub mod ports;
pub mod qdrant;
pub mod template_source;
