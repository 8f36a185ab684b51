//! Conversational knowledge curation across personas.

use std::sync::Arc;

use quill_core::config::CurationConfig;
use quill_core::errors::{QuillError, QuillResult};
use quill_core::models::Conversation;
use quill_core::parallel::run_bounded;
use quill_core::traits::{ILanguageModel, IRetrievalBackend};
use quill_observability::research_span;
use tracing::{info, warn};

use crate::dialogue::DialogueSimulator;
use crate::expert::TopicExpert;
use crate::persona::PersonaGenerator;
use crate::writer::WikiWriter;

/// Runs one dialogue per persona on a bounded pool.
pub struct KnowledgeCurator {
    config: CurationConfig,
    max_thread_num: usize,
    /// Persona generation and the topic expert.
    conversation_model: Arc<dyn ILanguageModel>,
    /// The writer's questions.
    question_model: Arc<dyn ILanguageModel>,
    backend: Arc<dyn IRetrievalBackend>,
    search_top_k: usize,
    ground_truth_url: Option<String>,
}

impl KnowledgeCurator {
    pub fn new(
        config: CurationConfig,
        max_thread_num: usize,
        conversation_model: Arc<dyn ILanguageModel>,
        question_model: Arc<dyn ILanguageModel>,
        backend: Arc<dyn IRetrievalBackend>,
        search_top_k: usize,
    ) -> Self {
        Self {
            config,
            max_thread_num,
            conversation_model,
            question_model,
            backend,
            search_top_k,
            ground_truth_url: None,
        }
    }

    /// Exclude the topic's ground-truth page from every search.
    pub fn with_ground_truth_url(mut self, url: impl Into<String>) -> Self {
        self.ground_truth_url = Some(url.into());
        self
    }

    /// Personas for `topic`; a single empty persona when perspectives are off.
    pub fn personas(&self, topic: &str) -> Vec<String> {
        if self.config.disable_perspective {
            return vec![String::new()];
        }
        let mut generator = PersonaGenerator::new(Arc::clone(&self.conversation_model));
        if self.config.persona_examples_from_search {
            generator = generator.with_examples_from(Arc::clone(&self.backend));
        }
        generator.generate(topic, self.config.max_perspective)
    }

    /// Run every persona's dialogue. A failed dialogue is logged and left out;
    /// conversations come back in completion order.
    pub fn research(&self, topic: &str) -> QuillResult<Vec<Conversation>> {
        if topic.trim().is_empty() {
            return Err(QuillError::EmptyInput);
        }
        let personas = self.personas(topic);
        let expert = self.expert();
        info!(topic, personas = personas.len(), "knowledge curation started");

        let outcomes = run_bounded(
            personas,
            self.max_thread_num,
            |persona| persona_label(persona),
            |persona| {
                let span = research_span!(topic, persona_label(&persona));
                let _guard = span.enter();
                let writer = WikiWriter::new(Arc::clone(&self.question_model), persona);
                Ok(DialogueSimulator::new(writer, &expert, self.config.max_conv_turn).run(topic))
            },
        );

        let mut conversations = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome.result {
                Ok(conversation) => conversations.push(conversation),
                Err(e) => warn!(persona = %outcome.label, error = %e, "dialogue failed, skipping"),
            }
        }
        info!(topic, conversations = conversations.len(), "knowledge curation finished");
        Ok(conversations)
    }

    fn expert(&self) -> TopicExpert {
        let expert = TopicExpert::new(
            Arc::clone(&self.conversation_model),
            Arc::clone(&self.backend),
            self.config.max_search_queries_per_turn,
            self.search_top_k,
        );
        match &self.ground_truth_url {
            Some(url) => expert.excluding(url.clone()),
            None => expert,
        }
    }
}

fn persona_label(persona: &str) -> String {
    let label = persona.split(':').next().unwrap_or_default().trim();
    if label.is_empty() {
        "default".to_string()
    } else {
        label.to_string()
    }
}
