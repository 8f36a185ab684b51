//! Outline generation: draft, rate and reorder, refine.

use std::sync::Arc;

use quill_core::config::OutlineConfig;
use quill_core::constants::TEXT_INPUT_WORD_LIMIT;
use quill_core::errors::QuillResult;
use quill_core::models::{CallKind, Conversation, LmRequest, OutlineRatings};
use quill_core::text::limit_word_count_preserve_newline;
use quill_core::traits::ILanguageModel;
use quill_observability::outline_span;
use tracing::{info, warn};

use crate::cleanup::{clean_up_outline, filter_heading_depth, normalize_heading_levels};
use crate::rater::OutlineRater;
use crate::transcript::format_transcript;

const DRAFT_INSTRUCTIONS: &str = "Write an outline for a Wikipedia page.\nHere is the format of your writing:\n\
1. Use \"#\" Title\" to indicate section title, \"##\" Title\" to indicate subsection title, \"###\" Title\" to indicate subsubsection title, and so on.\n\
2. Do not include other information.\n3. Do not include topic name itself in the outline.";

const REFINE_INSTRUCTIONS: &str = "Improve an outline for a Wikipedia page. You already have a draft outline that \
covers the general information. Now you want to improve it based on the information learned from an \
information-seeking conversation to make it more informative. The draft has been ordered by the section ratings \
given below; keep well-rated sections prominent.\nHere is the format of your writing:\n\
1. Use \"#\" Title\" to indicate section title, \"##\" Title\" to indicate subsection title, \"###\" Title\" to indicate subsubsection title, and so on.\n\
2. Do not include other information.\n3. Do not include topic name itself in the outline.";

const OUTLINE_FIELD: &str = "Write the Wikipedia page outline";

/// Every outline produced by one generation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutlineResult {
    /// The draft written from the topic alone.
    pub direct_outline: String,
    /// The draft after rating and reordering.
    pub rated_outline: String,
    pub ratings: OutlineRatings,
    /// The refined outline the article is written from.
    pub outline: String,
}

pub struct OutlineGenerator {
    model: Arc<dyn ILanguageModel>,
    config: OutlineConfig,
}

impl OutlineGenerator {
    pub fn new(model: Arc<dyn ILanguageModel>, config: OutlineConfig) -> Self {
        Self { model, config }
    }

    /// Draft from the topic (and source text when given), without dialogue.
    pub fn draft(&self, topic: &str, text_input: Option<&str>) -> QuillResult<String> {
        let mut request =
            LmRequest::new(CallKind::OutlineDrafting, DRAFT_INSTRUCTIONS, OUTLINE_FIELD)
                .field("The topic you want to write", topic);
        if let Some(text) = text_input.filter(|t| !t.trim().is_empty()) {
            request = request.field(
                "Source text",
                limit_word_count_preserve_newline(text, TEXT_INPUT_WORD_LIMIT),
            );
        }
        let output = self.model.generate(&request)?;
        Ok(self.tidy(&request.strip_output_label(&output), topic))
    }

    /// Refine `rated_outline` with the dialogue transcript and the ratings.
    pub fn refine(
        &self,
        topic: &str,
        rated_outline: &str,
        conversations: &[Conversation],
        ratings: &OutlineRatings,
    ) -> QuillResult<String> {
        let rating_json = serde_json::to_string_pretty(ratings)?;
        let request =
            LmRequest::new(CallKind::OutlineRefinement, REFINE_INSTRUCTIONS, OUTLINE_FIELD)
                .field("Topic you want to write", topic)
                .field("Conversation history", format_transcript(conversations))
                .field("Current outline", rated_outline)
                .field("Section ratings", rating_json);
        let output = self.model.generate(&request)?;
        Ok(self.tidy(&request.strip_output_label(&output), topic))
    }

    /// Full pass. Drafting, rating and refinement each degrade: a failed
    /// draft gives an empty draft, failed rating keeps the draft order, and
    /// a failed or empty refinement falls back to the rated draft.
    pub fn generate(
        &self,
        topic: &str,
        text_input: Option<&str>,
        conversations: &[Conversation],
    ) -> OutlineResult {
        let span = outline_span!(topic);
        let _guard = span.enter();

        let direct_outline = self.draft(topic, text_input).unwrap_or_else(|e| {
            warn!(topic, error = %e, "outline draft failed");
            String::new()
        });

        let (rated_outline, ratings) = if self.config.rating_enabled && !direct_outline.is_empty() {
            OutlineRater::new(Arc::clone(&self.model), self.config.clone())
                .rate_and_reorder(topic, &direct_outline)
        } else {
            (direct_outline.clone(), OutlineRatings::default())
        };

        let outline = match self.refine(topic, &rated_outline, conversations, &ratings) {
            Ok(refined) if !refined.trim().is_empty() => refined,
            Ok(_) => {
                warn!(topic, "refined outline is empty, using the rated draft");
                rated_outline.clone()
            }
            Err(e) => {
                warn!(topic, error = %e, "outline refinement failed, using the rated draft");
                rated_outline.clone()
            }
        };

        info!(
            topic,
            sections = outline.lines().filter(|l| l.starts_with("# ")).count(),
            "outline ready"
        );
        OutlineResult {
            direct_outline,
            rated_outline,
            ratings,
            outline,
        }
    }

    fn tidy(&self, raw: &str, topic: &str) -> String {
        let cleaned = normalize_heading_levels(&clean_up_outline(raw, topic));
        filter_heading_depth(&cleaned, self.config.max_heading_depth)
    }
}
