use serde::{Deserialize, Serialize};

use super::defaults;

/// Outline drafting, rating and refinement configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Rate and reorder the draft before refinement.
    pub rating_enabled: bool,
    pub rating_max_attempts: u32,
    /// Fixed sleep between rating attempts.
    pub rating_backoff_ms: u64,
    /// Minimum containment ratio for fuzzy heading matches.
    pub fuzzy_match_threshold: f64,
    /// Headings deeper than this are dropped from the refined outline.
    pub max_heading_depth: usize,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            rating_enabled: true,
            rating_max_attempts: defaults::DEFAULT_RATING_MAX_ATTEMPTS,
            rating_backoff_ms: defaults::DEFAULT_RATING_BACKOFF_MS,
            fuzzy_match_threshold: defaults::DEFAULT_FUZZY_MATCH_THRESHOLD,
            max_heading_depth: defaults::DEFAULT_MAX_HEADING_DEPTH,
        }
    }
}
