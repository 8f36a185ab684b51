//! Local ONNX sentence encoder via fastembed.

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use quill_core::errors::{EmbeddingError, QuillResult};
use quill_core::traits::IEmbeddingProvider;
use tracing::debug;

/// fastembed-backed provider. Loading downloads the model on first use.
pub struct FastEmbedProvider {
    model: TextEmbedding,
    model_name: String,
    dimensions: usize,
    batch_size: usize,
}

impl FastEmbedProvider {
    pub fn load(model_name: &str, batch_size: usize) -> QuillResult<Self> {
        let (variant, dimensions) = resolve_model(model_name).ok_or_else(|| {
            EmbeddingError::ModelLoadFailed {
                model: model_name.to_string(),
                reason: "unsupported embedding model".to_string(),
            }
        })?;

        let model = TextEmbedding::try_new(
            InitOptions::new(variant).with_show_download_progress(false),
        )
        .map_err(|e| EmbeddingError::ModelLoadFailed {
            model: model_name.to_string(),
            reason: e.to_string(),
        })?;

        debug!(model = model_name, dims = dimensions, "fastembed model loaded");

        Ok(Self {
            model,
            model_name: model_name.to_string(),
            dimensions,
            batch_size: batch_size.max(1),
        })
    }
}

fn resolve_model(name: &str) -> Option<(EmbeddingModel, usize)> {
    let short = name.rsplit('/').next().unwrap_or(name).to_ascii_lowercase();
    match short.as_str() {
        "all-minilm-l6-v2" => Some((EmbeddingModel::AllMiniLML6V2, 384)),
        "bge-small-en-v1.5" => Some((EmbeddingModel::BGESmallENV15, 384)),
        "bge-base-en-v1.5" => Some((EmbeddingModel::BGEBaseENV15, 768)),
        _ => None,
    }
}

impl IEmbeddingProvider for FastEmbedProvider {
    fn embed_batch(&mut self, texts: &[String]) -> QuillResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.model
            .embed(texts.to_vec(), Some(self.batch_size))
            .map_err(|e| {
                EmbeddingError::InferenceFailed {
                    reason: format!("{}: {e}", self.model_name),
                }
                .into()
            })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}
