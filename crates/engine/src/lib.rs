//! SpecForge Engine library.
//!
//! Turns free-text game briefs into structured specifications, specifications
//! into playable HTML5 code, and keeps a similarity index of stored specs.
//!
//! ## Structure
//!
//! - `use_cases/` - spec, code and vector services plus the pure extraction,
//!   rendering and prompt building they share
//! - `infrastructure/` - port traits and their HTTP adapters (OpenAI, embeddings, Qdrant)
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod prompt_templates;
pub mod use_cases;

pub use app::App;
