//! CrossEncoder: the process-wide reranking service.
//!
//! Like the sentence encoder, the relevance model is built on first use and
//! every call is serialized through one mutex. A model failure never fails the
//! query: the fused candidates are returned unreranked instead.

use std::sync::Mutex;

use once_cell::sync::OnceCell;
use quill_core::config::RerankerConfig;
use quill_core::errors::{EmbeddingError, QuillResult};
use quill_core::models::ScoredInformation;
use quill_core::traits::IRelevanceModel;
use tracing::{debug, info, warn};

use super::term_overlap::TermOverlapScorer;

/// Relevance model variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RerankerKind {
    FastEmbed,
    TermOverlap,
}

impl RerankerKind {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "fastembed" | "cross-encoder" => Some(Self::FastEmbed),
            "term-overlap" | "lexical" => Some(Self::TermOverlap),
            _ => None,
        }
    }
}

/// Build the configured relevance model, falling back to term overlap.
pub fn create_relevance_model(config: &RerankerConfig) -> Box<dyn IRelevanceModel> {
    let kind = RerankerKind::parse(&config.provider).unwrap_or_else(|| {
        warn!(provider = %config.provider, "unknown reranker provider, using term overlap");
        RerankerKind::TermOverlap
    });
    match kind {
        RerankerKind::FastEmbed => load_cross_encoder(config),
        RerankerKind::TermOverlap => Box::new(TermOverlapScorer),
    }
}

#[cfg(feature = "fastembed")]
fn load_cross_encoder(config: &RerankerConfig) -> Box<dyn IRelevanceModel> {
    match super::FastEmbedReranker::load(&config.model, config.batch_size) {
        Ok(model) => {
            info!(model = %config.model, "cross-encoder loaded");
            Box::new(model)
        }
        Err(e) => {
            warn!(error = %e, "cross-encoder failed to load, using term overlap");
            Box::new(TermOverlapScorer)
        }
    }
}

#[cfg(not(feature = "fastembed"))]
fn load_cross_encoder(_config: &RerankerConfig) -> Box<dyn IRelevanceModel> {
    warn!("cross-encoder requested but the `fastembed` feature is disabled, using term overlap");
    Box::new(TermOverlapScorer)
}

/// Result of reranking one query's fused candidates.
#[derive(Debug, Clone, Default)]
pub struct RerankOutcome {
    pub results: Vec<ScoredInformation>,
    /// The relevance model was not applied; `results` are fused candidates.
    pub fallback: bool,
}

type SharedModel = Mutex<Box<dyn IRelevanceModel>>;

pub struct CrossEncoder {
    config: RerankerConfig,
    model: OnceCell<SharedModel>,
}

impl CrossEncoder {
    pub fn new(config: RerankerConfig) -> Self {
        Self {
            config,
            model: OnceCell::new(),
        }
    }

    pub fn with_model(config: RerankerConfig, model: Box<dyn IRelevanceModel>) -> Self {
        let encoder = Self::new(config);
        let _ = encoder.model.set(Mutex::new(model));
        encoder
    }

    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    fn model(&self) -> &SharedModel {
        self.model.get_or_init(|| {
            let model = create_relevance_model(&self.config);
            info!(model = model.name(), "relevance model initialized");
            Mutex::new(model)
        })
    }

    /// Score passages against `query` under the model lock.
    pub fn score(&self, query: &str, passages: &[&str]) -> QuillResult<Vec<f64>> {
        let mut model = self.model().lock().map_err(|_| EmbeddingError::LockPoisoned {
            model: self.config.model.clone(),
        })?;
        let scores = model.score(query, passages)?;
        if scores.len() != passages.len() {
            return Err(EmbeddingError::InferenceFailed {
                reason: format!(
                    "relevance model returned {} scores for {} passages",
                    scores.len(),
                    passages.len()
                ),
            }
            .into());
        }
        Ok(scores)
    }

    /// Rerank fused candidates: score each candidate's first snippet, keep
    /// scores ≥ `threshold`, sort descending and keep `final_k`. Candidates
    /// with an empty first snippet are not scored. With nothing to score, or
    /// when the model fails, the fused candidates come back unreranked.
    pub fn rerank(
        &self,
        query: &str,
        candidates: Vec<ScoredInformation>,
        threshold: f64,
        final_k: usize,
    ) -> RerankOutcome {
        let scorable: Vec<&ScoredInformation> = candidates
            .iter()
            .filter(|c| !c.info.first_snippet().trim().is_empty())
            .collect();

        if scorable.is_empty() {
            debug!(query, "no candidate has a snippet, skipping rerank");
            return fallback(candidates, final_k);
        }

        let passages: Vec<&str> = scorable.iter().map(|c| c.info.first_snippet()).collect();
        match self.score(query, &passages) {
            Ok(scores) => {
                let infos = scorable.into_iter().map(|c| c.info.clone()).collect();
                RerankOutcome {
                    results: apply_threshold(infos, &scores, threshold, final_k),
                    fallback: false,
                }
            }
            Err(e) => {
                warn!(query, error = %e, "reranking failed, returning fused candidates");
                fallback(candidates, final_k)
            }
        }
    }
}

fn fallback(mut candidates: Vec<ScoredInformation>, final_k: usize) -> RerankOutcome {
    candidates.truncate(final_k);
    RerankOutcome {
        results: candidates,
        fallback: true,
    }
}

/// Pair candidates with their scores, drop those under `threshold`, sort
/// descending (stable) and keep `k`.
pub fn apply_threshold(
    candidates: Vec<quill_core::Information>,
    scores: &[f64],
    threshold: f64,
    k: usize,
) -> Vec<ScoredInformation> {
    let mut kept: Vec<ScoredInformation> = candidates
        .into_iter()
        .zip(scores.iter().copied())
        .filter(|(_, score)| *score >= threshold)
        .map(|(info, score)| ScoredInformation::new(info, score))
        .collect();
    kept.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    kept.truncate(k);
    kept
}
