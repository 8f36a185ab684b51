//! Persona generation.
//!
//! Related topics are looked up in the backend (one result each) and shown to
//! the persona call as "Title / Overview" examples. Personas come back as
//! numbered lines; the fixed default persona always leads the list.

use std::sync::{Arc, LazyLock};

use quill_core::constants::DEFAULT_PERSONA;
use quill_core::errors::QuillResult;
use quill_core::models::{CallKind, LmRequest};
use quill_core::traits::{ILanguageModel, IRetrievalBackend};
use regex::Regex;
use tracing::{debug, warn};

static NUMBERED_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\d+\.\s*(.*)$").unwrap());

const EXAMPLE_SEPARATOR: &str = "\n----------\n";

const RELATED_TOPICS_INSTRUCTIONS: &str = "I'm writing a Wikipedia page for a topic mentioned below. \
Please identify and recommend some Wikipedia pages on closely related subjects. \
I'm looking for examples that provide insights into interesting aspects commonly associated with this topic, \
or examples that help me understand the typical content and structure included in Wikipedia pages for similar topics.\n\
Please list the page titles, one per line.";

const PERSONA_INSTRUCTIONS: &str = "You need to select a group of Wikipedia editors who will work together to create \
a comprehensive article on the topic. Each of them represents a different perspective, role, or affiliation related \
to this topic. You can use other Wikipedia pages of related topics for inspiration. For each editor, add a description \
of what they will focus on.\nGive your answer in the following format: 1. short summary of editor 1: description\n\
2. short summary of editor 2: description\n...";

pub struct PersonaGenerator {
    model: Arc<dyn ILanguageModel>,
    backend: Option<Arc<dyn IRetrievalBackend>>,
}

impl PersonaGenerator {
    pub fn new(model: Arc<dyn ILanguageModel>) -> Self {
        Self { model, backend: None }
    }

    /// Look related topics up in `backend` to build persona examples.
    pub fn with_examples_from(mut self, backend: Arc<dyn IRetrievalBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// The default persona followed by at most `max_perspective` generated ones.
    /// A failed persona call leaves only the default persona.
    pub fn generate(&self, topic: &str, max_perspective: usize) -> Vec<String> {
        let mut personas = vec![DEFAULT_PERSONA.to_string()];
        match self.generated_personas(topic) {
            Ok(generated) => personas.extend(generated.into_iter().take(max_perspective)),
            Err(e) => warn!(
                topic,
                error = %e,
                "persona generation failed, using the default persona only"
            ),
        }
        debug!(topic, count = personas.len(), "personas ready");
        personas
    }

    fn generated_personas(&self, topic: &str) -> QuillResult<Vec<String>> {
        let examples = self.examples(topic);
        let request = LmRequest::new(CallKind::PersonaGeneration, PERSONA_INSTRUCTIONS, "Personas")
            .field("Topic of interest", topic)
            .field("Wiki page outlines of related topics for inspiration", examples);
        let output = self.model.generate(&request)?;
        Ok(parse_personas(&request.strip_output_label(&output)))
    }

    fn examples(&self, topic: &str) -> String {
        let Some(backend) = &self.backend else {
            return "N/A".to_string();
        };
        let request =
            LmRequest::new(CallKind::RelatedTopics, RELATED_TOPICS_INSTRUCTIONS, "Related topics")
                .field("Topic of interest", topic);
        let related = match self.model.generate(&request) {
            Ok(output) => parse_related_topics(&request.strip_output_label(&output)),
            Err(e) => {
                warn!(topic, error = %e, "related-topic call failed");
                Vec::new()
            }
        };

        let examples: Vec<String> = related
            .iter()
            .filter_map(|related_topic| {
                match backend.search(std::slice::from_ref(related_topic), 1, &[]) {
                    Ok(results) => results.into_iter().next().map(|info| {
                        format!("Title: {}\nOverview: {}", info.title, info.first_snippet())
                    }),
                    Err(e) => {
                        warn!(related_topic = %related_topic, error = %e, "example lookup failed");
                        None
                    }
                }
            })
            .collect();

        if examples.is_empty() {
            "N/A".to_string()
        } else {
            examples.join(EXAMPLE_SEPARATOR)
        }
    }
}

/// Text of every `N. text` line; other lines are ignored.
pub fn parse_personas(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| NUMBERED_LINE.captures(line))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

fn parse_related_topics(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            let line = line.trim().trim_start_matches(['-', '*']).trim();
            match NUMBERED_LINE.captures(line).and_then(|c| c.get(1)) {
                Some(m) => m.as_str().trim().to_string(),
                None => line.to_string(),
            }
        })
        .filter(|line| !line.is_empty())
        .collect()
}
