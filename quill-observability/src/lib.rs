//! # quill-observability
//!
//! Tracing subscriber setup, span macros for each pipeline phase, and the
//! in-memory query log that records per-query retrieval stages.

pub mod query_log;
pub mod tracing_setup;

pub use query_log::{QueryLog, QueryLogEntry};
pub use tracing_setup::{init_tracing, init_tracing_with_config};
