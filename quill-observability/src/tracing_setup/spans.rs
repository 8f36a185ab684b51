//! Span definitions per pipeline phase: research, retrieval, outline, generation, polish.

/// Create a knowledge-curation span for one persona dialogue.
#[macro_export]
macro_rules! research_span {
    ($topic:expr, $persona:expr) => {
        tracing::info_span!("quill.research", topic = %$topic, persona = %$persona)
    };
}

/// Create a retrieval span.
#[macro_export]
macro_rules! retrieval_span {
    ($query_count:expr) => {
        tracing::info_span!("quill.retrieval", queries = $query_count)
    };
}

/// Create an outline span.
#[macro_export]
macro_rules! outline_span {
    ($topic:expr) => {
        tracing::info_span!("quill.outline", topic = %$topic)
    };
}

/// Create a section-generation span.
#[macro_export]
macro_rules! generation_span {
    ($section:expr) => {
        tracing::info_span!("quill.generation", section = %$section)
    };
}

/// Create a polishing span.
#[macro_export]
macro_rules! polish_span {
    ($topic:expr) => {
        tracing::info_span!("quill.polish", topic = %$topic)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const RESEARCH: &str = "quill.research";
    pub const RETRIEVAL: &str = "quill.retrieval";
    pub const OUTLINE: &str = "quill.outline";
    pub const GENERATION: &str = "quill.generation";
    pub const POLISH: &str = "quill.polish";
}
