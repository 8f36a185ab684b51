//! Cross-encoder reranker backed by fastembed's `TextRerank`.

use fastembed::{RerankInitOptions, RerankerModel, TextRerank};
use quill_core::errors::{EmbeddingError, QuillResult};
use quill_core::traits::IRelevanceModel;

pub struct FastEmbedReranker {
    model: TextRerank,
    model_name: String,
    batch_size: usize,
}

impl FastEmbedReranker {
    pub fn load(model_name: &str, batch_size: usize) -> QuillResult<Self> {
        let variant = resolve_model(model_name).ok_or_else(|| EmbeddingError::ModelLoadFailed {
            model: model_name.to_string(),
            reason: "unsupported reranker model".to_string(),
        })?;
        let model = TextRerank::try_new(
            RerankInitOptions::new(variant).with_show_download_progress(false),
        )
        .map_err(|e| EmbeddingError::ModelLoadFailed {
            model: model_name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            model,
            model_name: model_name.to_string(),
            batch_size: batch_size.max(1),
        })
    }
}

fn resolve_model(name: &str) -> Option<RerankerModel> {
    let short = name.rsplit('/').next().unwrap_or(name).to_ascii_lowercase();
    match short.as_str() {
        "bge-reranker-base" => Some(RerankerModel::BGERerankerBase),
        "jina-reranker-v1-turbo-en" => Some(RerankerModel::JINARerankerV1TurboEn),
        _ => None,
    }
}

fn sigmoid(logit: f32) -> f64 {
    1.0 / (1.0 + (-(logit as f64)).exp())
}

impl IRelevanceModel for FastEmbedReranker {
    fn score(&mut self, query: &str, passages: &[&str]) -> QuillResult<Vec<f64>> {
        if passages.is_empty() {
            return Ok(Vec::new());
        }
        let results = self
            .model
            .rerank(query, passages, false, Some(self.batch_size))
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("{}: {e}", self.model_name),
            })?;

        // Results come back sorted by score; put them back in passage order.
        let mut scores = vec![0.0; passages.len()];
        for r in results {
            if let Some(slot) = scores.get_mut(r.index) {
                *slot = sigmoid(r.score);
            }
        }
        Ok(scores)
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}
