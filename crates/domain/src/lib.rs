//! SpecForge Domain - game specification documents.
//!
//! Holds the typed form of everything the LLM is asked to produce:
//! - `SpecDocument` and its parts (modes, mechanics, objectives, assets)
//! - `GeneratedFile` for code generation output
//!
//! LLM output is untrusted, so decoding is lenient: a field with the wrong
//! shape is dropped instead of rejecting the whole document.

pub mod error;
pub mod generated_file;
pub mod lenient;
pub mod spec_document;

pub use error::DomainError;
pub use generated_file::GeneratedFile;
pub use spec_document::{
    AssetGroup, FieldValue, GameMode, JsonObject, LabeledValues, Mechanic, Objectives,
    SpecDocument, DEFAULT_DURATION_SEC,
};
