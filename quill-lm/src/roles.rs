//! Per-role model roster.

use std::sync::Arc;

use quill_core::config::LanguageModelConfig;
use quill_core::errors::QuillResult;
use quill_core::traits::ILanguageModel;

use crate::history::{CallHistory, RecordingModel};
use crate::providers::create_model;

pub const CONVERSATION_ROLE: &str = "conversation";
pub const QUESTION_ASKER_ROLE: &str = "question_asker";
pub const OUTLINE_ROLE: &str = "outline";
pub const ARTICLE_ROLE: &str = "article";
pub const POLISH_ROLE: &str = "polish";

/// One model handle per pipeline role, each recording into a shared history.
#[derive(Clone)]
pub struct ModelRoles {
    /// Topic expert and persona generation.
    pub conversation: Arc<dyn ILanguageModel>,
    /// Writer questions.
    pub question_asker: Arc<dyn ILanguageModel>,
    /// Outline drafting, rating and refinement; topic improvement.
    pub outline: Arc<dyn ILanguageModel>,
    /// Query rewriting and section writing.
    pub article: Arc<dyn ILanguageModel>,
    /// Lead section, polish pass and title.
    pub polish: Arc<dyn ILanguageModel>,
    pub history: Arc<CallHistory>,
}

impl ModelRoles {
    /// Build every role from config; a role without an override uses the
    /// default spec.
    pub fn from_config(config: &LanguageModelConfig) -> QuillResult<Self> {
        let history = Arc::new(CallHistory::new());
        let build = |role: &str| -> QuillResult<Arc<dyn ILanguageModel>> {
            let inner = create_model(config.spec_for(role))?;
            Ok(Arc::new(RecordingModel::new(inner, role, Arc::clone(&history))))
        };
        Ok(Self {
            conversation: build(CONVERSATION_ROLE)?,
            question_asker: build(QUESTION_ASKER_ROLE)?,
            outline: build(OUTLINE_ROLE)?,
            article: build(ARTICLE_ROLE)?,
            polish: build(POLISH_ROLE)?,
            history,
        })
    }

    /// Use `model` for every role.
    pub fn uniform(model: Arc<dyn ILanguageModel>) -> Self {
        let history = Arc::new(CallHistory::new());
        let wrap = |role: &str| -> Arc<dyn ILanguageModel> {
            Arc::new(RecordingModel::new(Arc::clone(&model), role, Arc::clone(&history)))
        };
        Self {
            conversation: wrap(CONVERSATION_ROLE),
            question_asker: wrap(QUESTION_ASKER_ROLE),
            outline: wrap(OUTLINE_ROLE),
            article: wrap(ARTICLE_ROLE),
            polish: wrap(POLISH_ROLE),
            history,
        }
    }
}
