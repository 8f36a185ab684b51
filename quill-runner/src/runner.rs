//! QuillRunner: owns the services of one pipeline configuration and runs
//! topics through it.
//!
//! Only empty input fails a run. Every stage degrades on its own, and a
//! stage that is switched off, or whose input is missing, is skipped; the
//! output carries whatever the enabled stages produced.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use quill_article::{Article, ArticleGenerator, ArticlePolisher};
use quill_core::config::QuillConfig;
use quill_core::errors::QuillResult;
use quill_core::models::Conversation;
use quill_core::traits::{ILanguageModel, IRetrievalBackend};
use quill_curation::KnowledgeCurator;
use quill_embeddings::SentenceEncoder;
use quill_lm::roles::{
    ARTICLE_ROLE, CONVERSATION_ROLE, OUTLINE_ROLE, POLISH_ROLE, QUESTION_ASKER_ROLE,
};
use quill_lm::{CallHistory, ModelRoles};
use quill_observability::{init_tracing_with_config, QueryLog};
use quill_outline::{OutlineGenerator, OutlineResult};
use quill_retrieval::{create_backend, CrossEncoder, InformationTable};
use tracing::{info, warn};
use uuid::Uuid;

use crate::artifacts::{names, ArtifactWriter, RunConfigLog};
use crate::options::RunOptions;
use crate::topic::resolve_topic;

/// Everything one run produced.
pub struct RunOutput {
    pub run_id: String,
    pub topic: String,
    pub conversations: Vec<Conversation>,
    pub information_table: InformationTable,
    pub outline: Option<OutlineResult>,
    pub draft: Option<Article>,
    pub article: Option<Article>,
}

/// The pipeline services. The encoder and cross-encoder are shared by every
/// run's Evidence Store.
pub struct QuillRunner {
    config: QuillConfig,
    roles: ModelRoles,
    backend: Arc<dyn IRetrievalBackend>,
    encoder: Arc<SentenceEncoder>,
    cross_encoder: Arc<CrossEncoder>,
    query_log: Arc<QueryLog>,
}

impl QuillRunner {
    pub fn new(
        config: QuillConfig,
        roles: ModelRoles,
        backend: Arc<dyn IRetrievalBackend>,
    ) -> Self {
        let encoder = Arc::new(SentenceEncoder::new(config.embedding.clone()));
        let cross_encoder = Arc::new(CrossEncoder::new(config.reranker.clone()));
        let query_log = Arc::new(QueryLog::with_capacity(config.observability.query_log_capacity));
        Self {
            config,
            roles,
            backend,
            encoder,
            cross_encoder,
            query_log,
        }
    }

    /// Install tracing, then build the model roster and the search backend
    /// from `config`.
    pub fn from_config(config: QuillConfig) -> QuillResult<Self> {
        init_tracing_with_config(&config.observability);
        let roles = ModelRoles::from_config(&config.language_model)?;
        let backend: Arc<dyn IRetrievalBackend> =
            Arc::from(create_backend(&config.retrieval, Vec::new())?);
        Ok(Self::new(config, roles, backend))
    }

    pub fn config(&self) -> &QuillConfig {
        &self.config
    }

    pub fn history(&self) -> &CallHistory {
        &self.roles.history
    }

    pub fn query_log(&self) -> &QueryLog {
        &self.query_log
    }

    /// Run the enabled stages for one topic.
    ///
    /// # Errors
    /// [`quill_core::QuillError::EmptyInput`] when neither a topic nor text
    /// is given, and I/O or serialization errors while writing artifacts.
    pub fn run(&self, options: &RunOptions) -> QuillResult<RunOutput> {
        let text = options.text();
        let topic = resolve_topic(
            self.roles.outline.as_ref(),
            options.topic.as_deref(),
            text,
            options.improve_topic,
        )?;
        let run_id = Uuid::new_v4().to_string();
        info!(run_id = %run_id, topic = %topic, "run started");

        let artifacts = options.output_dir.as_ref().map(ArtifactWriter::create).transpose()?;
        if let Some(artifacts) = &artifacts {
            let run_config = self.run_config_log(&run_id, &topic, options);
            artifacts.write_json(names::RUN_CONFIG, &run_config)?;
        }

        let stages = options.stages;
        let mut information_table = self.information_table();

        let conversations = if stages.research {
            let conversations = self.research(&topic, options)?;
            information_table.merge_conversations(&conversations);
            if let Some(artifacts) = &artifacts {
                artifacts.write_json(names::CONVERSATION_LOG, &conversations)?;
                artifacts.write_json(names::RAW_SEARCH_RESULTS, &information_table.url_to_info())?;
            }
            conversations
        } else {
            Vec::new()
        };

        let outline = if stages.outline {
            let generator =
                OutlineGenerator::new(Arc::clone(&self.roles.outline), self.config.outline.clone());
            let outline = generator.generate(&topic, text, &conversations);
            if let Some(artifacts) = &artifacts {
                artifacts.write_text(names::DIRECT_OUTLINE, &outline.direct_outline)?;
                artifacts.write_text(names::RATED_OUTLINE, &outline.rated_outline)?;
                artifacts.write_json(names::OUTLINE_RATING, &outline.ratings)?;
                artifacts.write_text(names::OUTLINE, &outline.outline)?;
                let plain = Article::from_outline_str(&topic, &outline.outline)
                    .get_outline_as_list(None, false, false)
                    .join("\n");
                artifacts.write_text(names::OUTLINE_PLAIN, &plain)?;
            }
            Some(outline)
        } else {
            None
        };

        let draft = match (&outline, stages.article) {
            (Some(outline), true) => {
                if let Err(e) = information_table.prepare() {
                    warn!(
                        error = %e,
                        "evidence store could not be prepared, sections get no evidence"
                    );
                }
                let generator = ArticleGenerator::new(
                    Arc::clone(&self.roles.article),
                    self.config.generation.clone(),
                    self.config.max_thread_num,
                );
                let draft = generator.generate(&topic, &outline.outline, &information_table);
                if let Some(artifacts) = &artifacts {
                    artifacts.write_text(names::ARTICLE, &draft.to_string())?;
                    artifacts.write_json(names::REFERENCES, &draft.reference)?;
                }
                Some(draft)
            }
            (None, true) => {
                warn!(topic = %topic, "no outline, article stage skipped");
                None
            }
            (_, false) => None,
        };

        let article = match (&draft, stages.polish) {
            (Some(draft), true) => {
                let model = Arc::clone(&self.roles.polish);
                let polisher = ArticlePolisher::new(model, self.config.polish.clone());
                let article = polisher.polish(&topic, draft, text);
                if let Some(artifacts) = &artifacts {
                    artifacts.write_text(names::POLISHED_ARTICLE, &article.to_string())?;
                    artifacts.write_json(names::REFERENCES, &article.reference)?;
                }
                Some(article)
            }
            (None, true) => {
                warn!(topic = %topic, "no draft article, polish stage skipped");
                None
            }
            (_, false) => None,
        };

        if let Some(artifacts) = &artifacts {
            self.roles.history.write_jsonl(&artifacts.path(names::LM_HISTORY))?;
            if self.config.observability.query_log_enabled {
                self.query_log.write_json(&artifacts.path(names::QUERY_LOG))?;
            }
        }

        info!(
            run_id = %run_id,
            conversations = conversations.len(),
            evidence = information_table.len(),
            lm_calls = self.roles.history.len(),
            "run finished"
        );
        Ok(RunOutput {
            run_id,
            topic,
            conversations,
            information_table,
            outline,
            draft,
            article,
        })
    }

    fn research(&self, topic: &str, options: &RunOptions) -> QuillResult<Vec<Conversation>> {
        let mut curator = KnowledgeCurator::new(
            self.config.curation.clone(),
            self.config.max_thread_num,
            Arc::clone(&self.roles.conversation),
            Arc::clone(&self.roles.question_asker),
            Arc::clone(&self.backend),
            self.config.retrieval.search_top_k,
        );
        if let Some(url) = &options.ground_truth_url {
            curator = curator.with_ground_truth_url(url.clone());
        }
        curator.research(topic)
    }

    fn information_table(&self) -> InformationTable {
        let table = InformationTable::new(
            self.config.retrieval.clone(),
            Arc::clone(&self.encoder),
            Arc::clone(&self.cross_encoder),
        );
        if self.config.observability.query_log_enabled {
            table.with_query_logger(self.query_log.clone())
        } else {
            table
        }
    }

    fn run_config_log(&self, run_id: &str, topic: &str, options: &RunOptions) -> RunConfigLog {
        let model_name = |model: &Arc<dyn ILanguageModel>| model.model_name().to_string();
        let models = BTreeMap::from([
            (CONVERSATION_ROLE.to_string(), model_name(&self.roles.conversation)),
            (QUESTION_ASKER_ROLE.to_string(), model_name(&self.roles.question_asker)),
            (OUTLINE_ROLE.to_string(), model_name(&self.roles.outline)),
            (ARTICLE_ROLE.to_string(), model_name(&self.roles.article)),
            (POLISH_ROLE.to_string(), model_name(&self.roles.polish)),
        ]);
        RunConfigLog {
            run_id: run_id.to_string(),
            started_at: Utc::now(),
            topic: topic.to_string(),
            improve_topic: options.improve_topic,
            has_text_input: options.text().is_some(),
            ground_truth_url: options.ground_truth_url.clone(),
            stages: options.stages,
            models,
            config: self.config.clone(),
        }
    }
}
