use serde::{Deserialize, Serialize};

use super::Information;

/// One question/answer exchange. Immutable once logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueTurn {
    /// The writer's question.
    pub user_utterance: String,
    /// The topic expert's answer.
    pub agent_utterance: String,
    pub search_queries: Vec<String>,
    pub search_results: Vec<Information>,
}

/// A persona's complete dialogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Empty when perspective-guided curation is disabled.
    pub perspective: String,
    pub dlg_turns: Vec<DialogueTurn>,
}
