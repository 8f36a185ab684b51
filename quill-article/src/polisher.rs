//! Article polishing: lead section, optional duplicate removal, title, and
//! final citation ordering.

use std::sync::Arc;

use quill_core::config::PolishConfig;
use quill_core::constants::{POLISH_DRAFT_WORD_LIMIT, SUMMARY_SECTION_NAME, TEXT_INPUT_WORD_LIMIT};
use quill_core::models::{CallKind, LmRequest};
use quill_core::text::{clean_up_section, heading_level, limit_word_count_preserve_newline};
use quill_core::traits::ILanguageModel;
use quill_observability::polish_span;
use tracing::{info, warn};

use crate::article::Article;

const LEAD_INSTRUCTIONS: &str = "Write a lead section for the given Wikipedia page with the following guidelines:\n\
1. The lead should stand on its own as a concise overview of the article's topic. It should identify the topic, \
establish context, explain why the topic is notable, and summarize the most important points, including any prominent controversies.\n\
2. The lead section should be concise and contain no more than four well-composed paragraphs.\n\
3. The lead section should be carefully sourced as appropriate. Add inline citations (e.g., \"Washington, D.C., is the capital of the United States.[1][3].\") where necessary.";

const POLISH_INSTRUCTIONS: &str = "You are a faithful text editor that is good at finding repeated information in the \
article and deleting them to make sure there is no repetition in the article. You won't delete any non-repeated part \
in the article. You will keep the inline citations and article structure (indicated by \"#\", \"##\", etc.) appropriately. \
Do your job for the following article.";

const TITLE_INSTRUCTIONS: &str = "Write a short, descriptive title for the article below. Reply with the title only.";

const LEAD_PREFIX: &str = "The lead section:";

pub struct ArticlePolisher {
    model: Arc<dyn ILanguageModel>,
    config: PolishConfig,
}

impl ArticlePolisher {
    pub fn new(model: Arc<dyn ILanguageModel>, config: PolishConfig) -> Self {
        Self { model, config }
    }

    /// Produce the final article from `draft`. Failed calls degrade: no
    /// lead, the unpolished body, or the topic as title.
    pub fn polish(&self, topic: &str, draft: &Article, text_input: Option<&str>) -> Article {
        let span = polish_span!(topic);
        let _guard = span.enter();

        let draft_text = draft.to_string();
        let lead = self.lead_section(topic, &draft_text, text_input);
        let body = if self.config.remove_duplicate {
            self.remove_duplicates(&draft_text)
        } else {
            draft_text.clone()
        };

        let mut blocks: Vec<String> = Vec::new();
        if let Some(author) = self.config.author_block.as_deref().filter(|b| !b.trim().is_empty()) {
            blocks.push(author.trim().to_string());
        }
        if !lead.is_empty() {
            blocks.push(format!("# {SUMMARY_SECTION_NAME}\n{lead}"));
        }
        let metadata = self.config.metadata_block.as_deref();
        if let Some(metadata) = metadata.filter(|b| !b.trim().is_empty()) {
            blocks.push(metadata.trim().to_string());
        }
        blocks.push(body);
        let polished_text = blocks.join("\n\n");

        let title = self.title(topic, &draft_text);
        let mut article = Article::from_string(&title, &polished_text, draft.reference.clone());
        article.prune_empty_nodes();
        if !self.config.preserve_citation_order {
            article.reorder_reference_index();
        }
        info!(
            topic,
            title = %title,
            sections = article.sections_preorder().len(),
            references = article.reference.len(),
            "article polished"
        );
        article
    }

    fn lead_section(&self, topic: &str, draft_text: &str, text_input: Option<&str>) -> String {
        let mut request = LmRequest::new(CallKind::LeadWriting, LEAD_INSTRUCTIONS, "Lead section")
            .field("The topic of the page", topic);
        if let Some(text) = text_input.filter(|t| !t.trim().is_empty()) {
            request = request.field(
                "Source text",
                limit_word_count_preserve_newline(text, TEXT_INPUT_WORD_LIMIT),
            );
        }
        let request = request.field(
            "The draft page",
            limit_word_count_preserve_newline(draft_text, POLISH_DRAFT_WORD_LIMIT),
        );
        match self.model.generate(&request) {
            Ok(output) => {
                let lead = request.strip_output_label(&output);
                let lead = lead.trim().strip_prefix(LEAD_PREFIX).unwrap_or(lead.trim());
                // A lead is prose only.
                let prose: Vec<&str> =
                    lead.lines().filter(|l| heading_level(l).is_none()).collect();
                clean_up_section(&prose.join("\n"))
            }
            Err(e) => {
                warn!(topic, error = %e, "lead section failed, polishing without it");
                String::new()
            }
        }
    }

    fn remove_duplicates(&self, draft_text: &str) -> String {
        let request = LmRequest::new(CallKind::Polishing, POLISH_INSTRUCTIONS, "Revised article")
            .field("The article", draft_text);
        match self.model.generate(&request) {
            Ok(output) => {
                let revised = request.strip_output_label(&output);
                if revised.trim().is_empty() {
                    warn!("duplicate removal returned nothing, keeping the draft");
                    draft_text.to_string()
                } else {
                    revised
                }
            }
            Err(e) => {
                warn!(error = %e, "duplicate removal failed, keeping the draft");
                draft_text.to_string()
            }
        }
    }

    fn title(&self, topic: &str, draft_text: &str) -> String {
        let title_override = self.config.title_override.as_deref().map(str::trim);
        if let Some(title) = title_override.filter(|t| !t.is_empty()) {
            return title.to_string();
        }
        let request = LmRequest::new(CallKind::TitleGeneration, TITLE_INSTRUCTIONS, "Title")
            .field("Topic", topic)
            .field("Article", limit_word_count_preserve_newline(draft_text, 500));
        let generated = match self.model.generate(&request) {
            Ok(output) => request
                .strip_output_label(&output)
                .lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches('#')
                .trim()
                .trim_matches('"')
                .trim()
                .to_string(),
            Err(e) => {
                warn!(topic, error = %e, "title generation failed, using the topic");
                String::new()
            }
        };
        if generated.is_empty() {
            topic.to_string()
        } else {
            generated
        }
    }
}
