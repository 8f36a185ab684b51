use serde::{Deserialize, Serialize};

use super::defaults;

/// Section-wise article generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Fused candidates kept per section query before reranking.
    pub initial_retrieval_k: usize,
    /// Evidence kept per section query after reranking.
    pub final_context_k: usize,
    /// Do not generate sections named introduction, conclusion* or summary*.
    pub skip_boilerplate_sections: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            initial_retrieval_k: defaults::DEFAULT_INITIAL_RETRIEVAL_K,
            final_context_k: defaults::DEFAULT_FINAL_CONTEXT_K,
            skip_boilerplate_sections: false,
        }
    }
}

/// Polishing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolishConfig {
    /// Run the whole-document duplicate-removal pass.
    pub remove_duplicate: bool,
    /// Skip the final citation renumbering.
    pub preserve_citation_order: bool,
    /// Markdown block placed before the lead section.
    pub author_block: Option<String>,
    /// Markdown block placed right after the lead section.
    pub metadata_block: Option<String>,
    /// Use this title instead of generating one.
    pub title_override: Option<String>,
}
