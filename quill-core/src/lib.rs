//! # quill-core
//!
//! Foundation crate for the Quill research writer.
//! Defines the data model, the traits every external collaborator is reached
//! through, errors, config, constants, text processing shared by the
//! curation/outline/article stages, and the bounded worker pool.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod parallel;
pub mod text;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::QuillConfig;
pub use errors::{QuillError, QuillResult};
pub use models::{DialogueTurn, Information, ScoredInformation};
