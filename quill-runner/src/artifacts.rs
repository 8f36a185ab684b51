//! Run artifacts written to the output directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use quill_core::config::QuillConfig;
use quill_core::errors::{QuillError, QuillResult};
use serde::Serialize;
use tracing::debug;

use crate::options::StageSwitches;

pub mod names {
    pub const RUN_CONFIG: &str = "run_config.json";
    pub const CONVERSATION_LOG: &str = "conversation_log.json";
    pub const RAW_SEARCH_RESULTS: &str = "raw_search_results.json";
    pub const DIRECT_OUTLINE: &str = "direct_gen_outline.txt";
    pub const RATED_OUTLINE: &str = "rated_outline.txt";
    pub const OUTLINE: &str = "storm_gen_outline.txt";
    pub const OUTLINE_PLAIN: &str = "storm_gen_outline_plain.txt";
    pub const OUTLINE_RATING: &str = "outline_rating.json";
    pub const ARTICLE: &str = "storm_gen_article.txt";
    pub const POLISHED_ARTICLE: &str = "storm_gen_article_polished.txt";
    pub const REFERENCES: &str = "url_to_info.json";
    pub const LM_HISTORY: &str = "llm_call_history.jsonl";
    pub const QUERY_LOG: &str = "query_log.json";
}

/// Contents of `run_config.json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunConfigLog {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub topic: String,
    pub improve_topic: bool,
    pub has_text_input: bool,
    pub ground_truth_url: Option<String>,
    pub stages: StageSwitches,
    /// Role name → model name.
    pub models: BTreeMap<String, String>,
    pub config: QuillConfig,
}

/// Writes artifacts under one directory, creating it on construction.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    pub fn create(dir: impl Into<PathBuf>) -> QuillResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| io_error(&dir, source))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn write_text(&self, name: &str, text: &str) -> QuillResult<()> {
        let path = self.path(name);
        std::fs::write(&path, text).map_err(|source| io_error(&path, source))?;
        debug!(path = %path.display(), bytes = text.len(), "artifact written");
        Ok(())
    }

    pub fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> QuillResult<()> {
        let json = serde_json::to_string_pretty(value)?;
        self.write_text(name, &json)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> QuillError {
    QuillError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_directory_and_writes_json() {
        let root = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::create(root.path().join("run/nested")).unwrap();
        writer.write_json(names::OUTLINE_RATING, &BTreeMap::from([("a", 1)])).unwrap();

        let written = std::fs::read_to_string(writer.path(names::OUTLINE_RATING)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["a"], 1);
    }
}
