//! InformationTable: the Evidence Store.
//!
//! Holds every document the curation dialogues retrieved, merged by URL, and
//! answers hybrid queries once [`InformationTable::prepare`] has built the
//! derived indices. The flattened snippet list, its dense vectors and the BM25
//! index live in one [`PreparedIndex`] value so they are only ever rebuilt
//! together; any content change drops it.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use quill_core::config::RetrievalConfig;
use quill_core::errors::QuillResult;
use quill_core::models::{Conversation, DialogueTurn, QueryTrace, ScoredInformation, StageHit};
use quill_core::traits::IQueryLogger;
use quill_core::Information;
use quill_embeddings::SentenceEncoder;
use quill_observability::retrieval_span;
use tracing::{debug, info, warn};

use crate::ranking::CrossEncoder;
use crate::search::{fuse, Bm25Index, Bm25Params, DenseIndex};

/// Per-call retrieval sizes.
#[derive(Debug, Clone, Copy)]
pub struct RetrieveParams {
    pub initial_k: usize,
    pub final_k: usize,
}

impl From<&RetrievalConfig> for RetrieveParams {
    fn from(config: &RetrievalConfig) -> Self {
        Self {
            initial_k: config.initial_retrieval_k,
            final_k: config.final_context_k,
        }
    }
}

/// One flattened snippet: owning record and snippet text.
#[derive(Debug)]
struct SnippetEntry {
    record: usize,
    snippet: String,
}

#[derive(Debug)]
struct PreparedIndex {
    entries: Vec<SnippetEntry>,
    dense: DenseIndex,
    sparse: Bm25Index,
}

pub struct InformationTable {
    records: Vec<Information>,
    by_url: HashMap<String, usize>,
    prepared: Option<PreparedIndex>,
    config: RetrievalConfig,
    encoder: Arc<SentenceEncoder>,
    cross_encoder: Arc<CrossEncoder>,
    query_logger: Option<Arc<dyn IQueryLogger>>,
}

impl InformationTable {
    pub fn new(
        config: RetrievalConfig,
        encoder: Arc<SentenceEncoder>,
        cross_encoder: Arc<CrossEncoder>,
    ) -> Self {
        Self {
            records: Vec::new(),
            by_url: HashMap::new(),
            prepared: None,
            config,
            encoder,
            cross_encoder,
            query_logger: None,
        }
    }

    pub fn with_query_logger(mut self, logger: Arc<dyn IQueryLogger>) -> Self {
        self.query_logger = Some(logger);
        self
    }

    /// Merge one record. Same-URL records union their snippets.
    pub fn merge(&mut self, info: Information) {
        self.prepared = None;
        match self.by_url.get(&info.url) {
            Some(&i) => self.records[i].merge(&info),
            None => {
                let mut info = info;
                info.dedup_snippets();
                self.by_url.insert(info.url.clone(), self.records.len());
                self.records.push(info);
            }
        }
    }

    pub fn merge_turn(&mut self, turn: &DialogueTurn) {
        for info in &turn.search_results {
            self.merge(info.clone());
        }
    }

    /// Merge every search result of every turn of every conversation.
    pub fn merge_conversations(&mut self, conversations: &[Conversation]) {
        for conversation in conversations {
            for turn in &conversation.dlg_turns {
                self.merge_turn(turn);
            }
        }
        info!(
            documents = self.records.len(),
            conversations = conversations.len(),
            "evidence merged"
        );
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, url: &str) -> Option<&Information> {
        self.by_url.get(url).map(|&i| &self.records[i])
    }

    /// Records in first-merge order.
    pub fn records(&self) -> &[Information] {
        &self.records
    }

    /// URL-keyed snapshot for persistence.
    pub fn url_to_info(&self) -> BTreeMap<String, Information> {
        self.records
            .iter()
            .map(|r| (r.url.clone(), r.clone()))
            .collect()
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared.is_some()
    }

    /// Number of flattened snippets in the prepared index.
    pub fn snippet_count(&self) -> usize {
        self.prepared.as_ref().map_or(0, |p| p.entries.len())
    }

    /// Build the flattened snippet list, its dense vectors, and the BM25
    /// index. Must complete before any retrieval call.
    pub fn prepare(&mut self) -> QuillResult<()> {
        let started = Instant::now();
        let entries: Vec<SnippetEntry> = self
            .records
            .iter()
            .enumerate()
            .flat_map(|(record, info)| {
                info.snippets.iter().map(move |s| SnippetEntry {
                    record,
                    snippet: s.clone(),
                })
            })
            .collect();

        let corpus: Vec<String> = entries.iter().map(|e| e.snippet.clone()).collect();
        let vectors = if corpus.is_empty() {
            Vec::new()
        } else {
            self.encoder.fit(&corpus)?;
            self.encoder.encode(&corpus)?
        };
        let sparse = Bm25Index::build(
            &corpus,
            Bm25Params {
                k1: self.config.bm25_k1,
                b: self.config.bm25_b,
                epsilon: self.config.bm25_epsilon,
            },
        );

        info!(
            documents = self.records.len(),
            snippets = entries.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "evidence store prepared"
        );

        self.prepared = Some(PreparedIndex {
            entries,
            dense: DenseIndex::new(vectors),
            sparse,
        });
        Ok(())
    }

    fn hit(&self, prepared: &PreparedIndex, entry: usize, score: f64) -> ScoredInformation {
        let e = &prepared.entries[entry];
        ScoredInformation::new(self.records[e.record].with_single_snippet(&e.snippet), score)
    }

    /// Dense top-`k` by cosine similarity. Empty before `prepare()`.
    pub fn dense_search(&self, query: &str, k: usize) -> QuillResult<Vec<ScoredInformation>> {
        let Some(prepared) = &self.prepared else {
            return Ok(Vec::new());
        };
        if prepared.dense.is_empty() {
            return Ok(Vec::new());
        }
        let query_vec = self.encoder.encode_one(query)?;
        Ok(prepared
            .dense
            .top_k(&query_vec, k)
            .into_iter()
            .map(|(i, score)| self.hit(prepared, i, score))
            .collect())
    }

    /// Sparse top-`k` with scores normalized to [0, 1]. Empty before `prepare()`.
    pub fn sparse_search(&self, query: &str, k: usize) -> Vec<ScoredInformation> {
        let Some(prepared) = &self.prepared else {
            return Vec::new();
        };
        prepared
            .sparse
            .top_k_normalized(query, k)
            .into_iter()
            .map(|(i, score)| self.hit(prepared, i, score))
            .collect()
    }

    /// Hybrid retrieval for one query: dense + sparse, fusion, rerank.
    pub fn retrieve_one(&self, query: &str, params: RetrieveParams) -> Vec<Information> {
        if self.prepared.is_none() {
            warn!(query, "retrieve called before prepare, returning nothing");
            return Vec::new();
        }
        let started = Instant::now();

        let dense = self.dense_search(query, params.initial_k).unwrap_or_else(|e| {
            warn!(query, error = %e, "dense search failed, continuing with sparse only");
            Vec::new()
        });
        let sparse = self.sparse_search(query, params.initial_k);

        let mut trace = QueryTrace {
            query: query.to_string(),
            dense: stage_hits(&dense),
            sparse: stage_hits(&sparse),
            ..QueryTrace::default()
        };

        let fused = fuse(
            dense,
            sparse,
            self.config.vector_weight,
            self.config.bm25_weight,
            params.initial_k,
        );
        trace.fused = stage_hits(&fused);

        let outcome = self.cross_encoder.rerank(
            query,
            fused,
            self.config.reranker_threshold,
            params.final_k,
        );
        trace.reranked = stage_hits(&outcome.results);
        trace.rerank_fallback = outcome.fallback;
        trace.latency_ms = started.elapsed().as_millis() as u64;

        debug!(
            query,
            fused = trace.fused.len(),
            kept = trace.reranked.len(),
            fallback = trace.rerank_fallback,
            "query retrieved"
        );
        if let Some(logger) = &self.query_logger {
            logger.log_query(trace);
        }

        outcome.results.into_iter().map(|r| r.info).collect()
    }

    /// Run each query independently, concatenate, and keep the first
    /// occurrence of every URL.
    pub fn retrieve(&self, queries: &[String], params: RetrieveParams) -> Vec<Information> {
        let span = retrieval_span!(queries.len());
        let _guard = span.enter();
        let mut seen: HashSet<String> = HashSet::new();
        let mut out = Vec::new();
        for query in queries {
            for info in self.retrieve_one(query, params) {
                if seen.insert(info.url.clone()) {
                    out.push(info);
                }
            }
        }
        out
    }
}

fn stage_hits(hits: &[ScoredInformation]) -> Vec<StageHit> {
    hits.iter()
        .map(|h| StageHit {
            url: h.info.url.clone(),
            score: h.score,
        })
        .collect()
}
