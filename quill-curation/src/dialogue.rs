//! One persona's writer/expert dialogue.

use quill_core::constants::CONVERSATION_END_PHRASE;
use quill_core::models::{Conversation, DialogueTurn};
use tracing::{debug, warn};

use crate::expert::TopicExpert;
use crate::writer::WikiWriter;

/// Question asked before the open-ended loop starts.
pub fn seed_question(topic: &str) -> String {
    format!("What are the key facts, data points and statistics about {topic}?")
}

/// Runs `seed turn → {ask → answer}*` for one persona. The seed turn counts
/// toward `max_turns`.
pub struct DialogueSimulator<'a> {
    writer: WikiWriter,
    expert: &'a TopicExpert,
    max_turns: usize,
}

impl<'a> DialogueSimulator<'a> {
    pub fn new(writer: WikiWriter, expert: &'a TopicExpert, max_turns: usize) -> Self {
        Self {
            writer,
            expert,
            max_turns,
        }
    }

    pub fn run(&self, topic: &str) -> Conversation {
        let mut turns: Vec<DialogueTurn> = Vec::new();
        if self.max_turns == 0 {
            return self.conversation(turns);
        }

        turns.push(self.exchange(topic, seed_question(topic)));

        while turns.len() < self.max_turns {
            let question = match self.writer.ask(topic, &turns) {
                Ok(q) => q.trim().to_string(),
                Err(e) => {
                    warn!(
                        persona = %self.writer.persona(),
                        error = %e,
                        "question call failed, ending dialogue"
                    );
                    break;
                }
            };
            if question.is_empty() || question.starts_with(CONVERSATION_END_PHRASE) {
                debug!(
                    persona = %self.writer.persona(),
                    turns = turns.len(),
                    "writer ended dialogue"
                );
                break;
            }
            turns.push(self.exchange(topic, question));
        }

        self.conversation(turns)
    }

    fn exchange(&self, topic: &str, question: String) -> DialogueTurn {
        let answer = self.expert.answer(topic, &question);
        DialogueTurn {
            user_utterance: question,
            agent_utterance: answer.answer,
            search_queries: answer.queries,
            search_results: answer.results,
        }
    }

    fn conversation(&self, dlg_turns: Vec<DialogueTurn>) -> Conversation {
        Conversation {
            perspective: self.writer.persona().to_string(),
            dlg_turns,
        }
    }
}
