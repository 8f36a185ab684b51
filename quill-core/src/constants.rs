/// Quill version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Persona always placed first when perspective-guided curation is enabled.
pub const DEFAULT_PERSONA: &str =
    "Basic fact writer: Basic fact writer focusing on broadly covering the basic facts about the topic.";

/// A writer utterance starting with this phrase ends the dialogue.
pub const CONVERSATION_END_PHRASE: &str = "Thank you so much for your help!";

/// Expert reply when the backend returns nothing.
pub const NO_INFORMATION_ANSWER: &str =
    "Sorry, I cannot find information for this question. Please ask another question.";

/// Expert reply when answer synthesis fails.
pub const CANNOT_ANSWER: &str =
    "Sorry, I cannot answer this question. Please ask another question.";

/// Placeholder for expert answers outside the recent-turn window.
pub const OMITTED_ANSWER: &str = "Omit the answer here due to space limit.";

/// Number of most recent turns whose expert answers stay in the writer's view.
pub const RECENT_TURNS_WITH_ANSWERS: usize = 4;

/// Word caps on the various prompt contexts.
pub const WRITER_HISTORY_WORD_LIMIT: usize = 2_500;
pub const EXPERT_INFO_WORD_LIMIT: usize = 1_000;
pub const OUTLINE_TRANSCRIPT_WORD_LIMIT: usize = 5_000;
pub const SECTION_INFO_WORD_LIMIT: usize = 1_500;
pub const POLISH_DRAFT_WORD_LIMIT: usize = 6_000;
pub const TEXT_INPUT_WORD_LIMIT: usize = 2_000;

/// Name of the lead section the polisher inserts.
pub const SUMMARY_SECTION_NAME: &str = "summary";

/// Headings dropped from generated outlines together with their subsections.
pub const BOILERPLATE_OUTLINE_SECTIONS: &[&str] = &[
    "see also",
    "references",
    "external links",
    "further reading",
    "notes",
    "bibliography",
    "sources",
];
