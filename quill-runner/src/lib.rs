//! # quill-runner
//!
//! Runs the whole pipeline for one topic: topic resolution, knowledge
//! curation, outline generation, article generation and polishing, writing
//! each stage's artifacts to an output directory when one is given.

pub mod artifacts;
pub mod options;
pub mod runner;
pub mod topic;

pub use artifacts::{ArtifactWriter, RunConfigLog};
pub use options::{RunOptions, StageSwitches};
pub use runner::{QuillRunner, RunOutput};
pub use topic::resolve_topic;
