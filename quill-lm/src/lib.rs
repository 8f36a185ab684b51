//! # quill-lm
//!
//! Everything that talks to a language model.
//!
//! ```text
//! ModelRoles (one handle per pipeline role)
//! └── RecordingModel (appends every call to CallHistory)
//!     └── dyn ILanguageModel
//!         ├── OpenAiCompatible (OpenAI, Azure OpenAI)
//!         └── OllamaModel
//! ```

pub mod history;
pub mod providers;
pub mod roles;

pub use history::{CallHistory, CallRecord, RecordingModel};
pub use providers::{create_model, LmProvider, OllamaModel, OpenAiCompatible};
pub use roles::ModelRoles;
