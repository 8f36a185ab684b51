//! Test doubles and golden fixtures shared by the Quill crates' tests.
//!
//! - [`ScriptedModel`]: language model answering from per-call-kind scripts.
//! - [`InMemoryBackend`]: word-overlap search over a fixed corpus.
//! - JSON fixture loading from `test-fixtures/golden`.

mod scripted;

pub use quill_retrieval::InMemoryBackend;
pub use scripted::ScriptedModel;

use std::path::PathBuf;
use std::sync::Arc;

use quill_core::config::{EmbeddingConfig, RerankerConfig, RetrievalConfig};
use quill_core::Information;
use quill_embeddings::SentenceEncoder;
use quill_retrieval::{CrossEncoder, InformationTable};
use serde::de::DeserializeOwned;

/// Root directory of the test-fixtures folder.
pub fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up to find test-fixtures.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);
    while !path.join("test-fixtures").exists() {
        if !path.pop() {
            panic!("Could not find test-fixtures directory from CARGO_MANIFEST_DIR={manifest_dir}");
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture file as raw JSON Value.
pub fn load_fixture_value(relative_path: &str) -> serde_json::Value {
    load_fixture(relative_path)
}

/// Build an [`Information`] whose title is its URL.
pub fn info(url: &str, snippets: &[&str]) -> Information {
    Information::new(url, url, "", snippets.iter().map(|s| s.to_string()).collect())
}

/// Small corpus about coral reefs, used by the dialogue and pipeline tests.
pub fn reef_corpus() -> Vec<Information> {
    vec![
        Information::new(
            "https://reefs.example/bleaching",
            "Coral bleaching",
            "Causes of bleaching events",
            vec![
                "Coral bleaching happens when warm water drives algae out of coral tissue.".into(),
                "Mass bleaching events were recorded in 1998, 2010 and 2016.".into(),
            ],
        ),
        Information::new(
            "https://reefs.example/economy",
            "Reef economy",
            "Economic value of reefs",
            vec!["Reef tourism and fisheries support coastal economies worth billions.".into()],
        ),
        Information::new(
            "https://reefs.example/restoration",
            "Reef restoration",
            "Restoration techniques",
            vec!["Coral gardening transplants nursery fragments onto damaged reefs.".into()],
        ),
        Information::new(
            "https://wiki.example/Coral_reef",
            "Coral reef",
            "Encyclopedia entry",
            vec!["Coral reefs are underwater ecosystems built by reef-building corals.".into()],
        ),
    ]
}

/// A prepared Evidence Store over `corpus` using the hashing encoder and the
/// term-overlap reranker.
///
/// # Panics
/// Panics if the index cannot be built.
pub fn prepared_table(corpus: Vec<Information>, reranker_threshold: f64) -> InformationTable {
    let retrieval = RetrievalConfig {
        reranker_threshold,
        ..RetrievalConfig::default()
    };
    let embedding = EmbeddingConfig {
        provider: "tfidf".to_string(),
        dimensions: 128,
        ..EmbeddingConfig::default()
    };
    let mut table = InformationTable::new(
        retrieval,
        Arc::new(SentenceEncoder::new(embedding)),
        Arc::new(CrossEncoder::new(RerankerConfig::default())),
    );
    for info in corpus {
        table.merge(info);
    }
    table
        .prepare()
        .unwrap_or_else(|e| panic!("Failed to prepare evidence table: {e}"));
    table
}
