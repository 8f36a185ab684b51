use serde::{Deserialize, Serialize};

use super::defaults;

/// Conversational knowledge-curation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CurationConfig {
    /// Maximum exchanges per persona dialogue, seed turn included.
    pub max_conv_turn: usize,
    /// Generated personas kept in addition to the default one.
    pub max_perspective: usize,
    /// Run a single persona-free dialogue instead.
    pub disable_perspective: bool,
    pub max_search_queries_per_turn: usize,
    /// Look related topics up in the backend to give the persona call examples.
    pub persona_examples_from_search: bool,
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            max_conv_turn: defaults::DEFAULT_MAX_CONV_TURN,
            max_perspective: defaults::DEFAULT_MAX_PERSPECTIVE,
            disable_perspective: false,
            max_search_queries_per_turn: defaults::DEFAULT_MAX_SEARCH_QUERIES_PER_TURN,
            persona_examples_from_search: true,
        }
    }
}
