use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which pipeline stages run. A stage whose input is missing (an article
/// without an outline, a polish without a draft) is skipped even when on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageSwitches {
    pub research: bool,
    pub outline: bool,
    pub article: bool,
    pub polish: bool,
}

impl Default for StageSwitches {
    fn default() -> Self {
        Self {
            research: true,
            outline: true,
            article: true,
            polish: true,
        }
    }
}

/// Options for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    /// Topic to research. Derived from `text_input` when absent.
    pub topic: Option<String>,
    /// Free text to ground the outline and lead section on.
    pub text_input: Option<String>,
    /// Ask the model to rewrite a given topic before researching it.
    pub improve_topic: bool,
    /// URL excluded from every search, e.g. the topic's existing article.
    pub ground_truth_url: Option<String>,
    /// Where artifacts are written. Nothing is written when `None`.
    pub output_dir: Option<PathBuf>,
    pub stages: StageSwitches,
}

impl RunOptions {
    pub fn for_topic(topic: impl Into<String>) -> Self {
        Self {
            topic: Some(topic.into()),
            ..Self::default()
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Trimmed text input, `None` when blank.
    pub fn text(&self) -> Option<&str> {
        self.text_input.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}
