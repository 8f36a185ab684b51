//! Dialogue transcript for outline refinement.

use quill_core::constants::OUTLINE_TRANSCRIPT_WORD_LIMIT;
use quill_core::models::Conversation;
use quill_core::text::{limit_word_count_preserve_newline, remove_citations};

/// Every persona's turns as `Wikipedia Writer: … / Expert: …` pairs.
///
/// Turns whose question mentions "topic you" (the writer restating its own
/// task) are skipped, citations are removed and the result is word-capped.
pub fn format_transcript(conversations: &[Conversation]) -> String {
    let lines: Vec<String> = conversations
        .iter()
        .flat_map(|c| c.dlg_turns.iter())
        .filter(|turn| !turn.user_utterance.to_lowercase().contains("topic you"))
        .map(|turn| {
            format!(
                "Wikipedia Writer: {}\nExpert: {}",
                turn.user_utterance.trim(),
                remove_citations(&turn.agent_utterance).trim()
            )
        })
        .collect();
    limit_word_count_preserve_newline(&lines.join("\n"), OUTLINE_TRANSCRIPT_WORD_LIMIT)
}
