use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One retrieved document or fragment. The URL is its identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Information {
    pub url: String,
    pub title: String,
    pub description: String,
    /// Ordered text fragments. Treated as a set when records are merged.
    pub snippets: Vec<String>,
    #[serde(default)]
    pub meta: BTreeMap<String, serde_json::Value>,
}

impl Information {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        snippets: Vec<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            description: description.into(),
            snippets,
            meta: BTreeMap::new(),
        }
    }

    /// Union `other`'s snippets into this record. Duplicates collapse; the
    /// first occurrence keeps its position. Metadata already present wins.
    pub fn merge(&mut self, other: &Information) {
        for snippet in &other.snippets {
            if !self.snippets.contains(snippet) {
                self.snippets.push(snippet.clone());
            }
        }
        if self.title.is_empty() {
            self.title = other.title.clone();
        }
        if self.description.is_empty() {
            self.description = other.description.clone();
        }
        for (key, value) in &other.meta {
            self.meta.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }

    /// Collapse duplicate snippets in place.
    pub fn dedup_snippets(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.snippets.retain(|s| seen.insert(s.clone()));
    }

    /// Copy of this record carrying only `snippet`.
    pub fn with_single_snippet(&self, snippet: &str) -> Self {
        Self {
            url: self.url.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            snippets: vec![snippet.to_string()],
            meta: self.meta.clone(),
        }
    }

    /// First snippet, or "" when there is none.
    pub fn first_snippet(&self) -> &str {
        self.snippets.first().map(String::as_str).unwrap_or("")
    }
}

/// An [`Information`] paired with a relevance score from one retrieval stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredInformation {
    pub info: Information,
    pub score: f64,
}

impl ScoredInformation {
    pub fn new(info: Information, score: f64) -> Self {
        Self { info, score }
    }
}
