//! # quill-curation
//!
//! Conversational knowledge curation: a persona generator diversifies the
//! research, and one simulated writer/expert dialogue per persona gathers
//! evidence through the retrieval backend.

pub mod curator;
pub mod dialogue;
pub mod expert;
pub mod persona;
pub mod writer;

pub use curator::KnowledgeCurator;
pub use dialogue::DialogueSimulator;
pub use expert::{ExpertAnswer, TopicExpert};
pub use persona::PersonaGenerator;
pub use writer::WikiWriter;
