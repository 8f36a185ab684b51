//! The writer role: asks the next question of a persona dialogue.

use std::sync::Arc;

use quill_core::constants::{OMITTED_ANSWER, RECENT_TURNS_WITH_ANSWERS, WRITER_HISTORY_WORD_LIMIT};
use quill_core::errors::QuillResult;
use quill_core::models::{CallKind, DialogueTurn, LmRequest};
use quill_core::text::{limit_word_count_preserve_newline, remove_citations};
use quill_core::traits::ILanguageModel;

const QUESTION_INSTRUCTIONS: &str = "You are an experienced Wikipedia writer. You are chatting with an expert to get \
information for the topic you want to contribute. Ask good questions to get more useful information relevant to the topic.\n\
When you have no more question to ask, say \"Thank you so much for your help!\" to end the conversation.\n\
Please only ask a question at a time and don't ask what you have asked before. Your questions should be related to the topic you want to write.";

const PERSPECTIVE_QUESTION_INSTRUCTIONS: &str = "You are an experienced Wikipedia writer and want to edit a specific page. \
Besides your identity as a Wikipedia writer, you have specific focus when researching the topic.\n\
Now, you are chatting with an expert to get information. Ask good questions to get more useful information.\n\
When you have no more question to ask, say \"Thank you so much for your help!\" to end the conversation.\n\
Please only ask a question at a time and don't ask what you have asked before. Your questions should be related to the topic you want to write.";

/// Asks questions from one persona's point of view. An empty persona uses
/// the persona-free prompt.
pub struct WikiWriter {
    model: Arc<dyn ILanguageModel>,
    persona: String,
}

impl WikiWriter {
    pub fn new(model: Arc<dyn ILanguageModel>, persona: impl Into<String>) -> Self {
        Self {
            model,
            persona: persona.into(),
        }
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// Propose the next question. The raw completion is trimmed; callers
    /// decide whether it ends the dialogue.
    pub fn ask(&self, topic: &str, history: &[DialogueTurn]) -> QuillResult<String> {
        let conversation = format_history(history);
        let request = if self.persona.trim().is_empty() {
            LmRequest::new(CallKind::QuestionAsking, QUESTION_INSTRUCTIONS, "Question")
                .field("Topic you want to write", topic)
                .field("Conversation history", conversation)
        } else {
            LmRequest::new(CallKind::QuestionAsking, PERSPECTIVE_QUESTION_INSTRUCTIONS, "Question")
                .field("Topic you want to write", topic)
                .field("Your perspective", &self.persona)
                .field("Conversation history", conversation)
        };
        let output = self.model.generate(&request)?;
        Ok(request.strip_output_label(&output))
    }
}

/// Render the dialogue so far for the question prompt.
///
/// Only the most recent turns keep their answers, with citations removed.
/// The result is word-capped; an empty history renders as `N/A`.
pub fn format_history(turns: &[DialogueTurn]) -> String {
    let recent_start = turns.len().saturating_sub(RECENT_TURNS_WITH_ANSWERS);
    let lines: Vec<String> = turns
        .iter()
        .enumerate()
        .map(|(i, turn)| {
            let answer = if i >= recent_start {
                remove_citations(&turn.agent_utterance)
            } else {
                OMITTED_ANSWER.to_string()
            };
            format!("You: {}\nExpert: {}", turn.user_utterance.trim(), answer.trim())
        })
        .collect();

    let history = limit_word_count_preserve_newline(&lines.join("\n"), WRITER_HISTORY_WORD_LIMIT);
    if history.trim().is_empty() {
        "N/A".to_string()
    } else {
        history
    }
}
