//! Retrieval query log: per-query stage hits, fallback flag, and latency.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use quill_core::errors::{QuillError, QuillResult};
use quill_core::models::{QueryTrace, StageHit};
use quill_core::traits::IQueryLogger;
use serde::{Deserialize, Serialize};

/// A single query log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryLogEntry {
    pub query: String,
    pub dense: Vec<StageHit>,
    pub sparse: Vec<StageHit>,
    pub fused: Vec<StageHit>,
    pub reranked: Vec<StageHit>,
    pub rerank_fallback: bool,
    pub latency_ms: u64,
    pub timestamp_epoch_ms: i64,
}

impl QueryLogEntry {
    /// Create an entry from a trace with the timestamp set to now.
    pub fn from_trace(trace: QueryTrace) -> Self {
        Self {
            query: trace.query,
            dense: trace.dense,
            sparse: trace.sparse,
            fused: trace.fused,
            reranked: trace.reranked,
            rerank_fallback: trace.rerank_fallback,
            latency_ms: trace.latency_ms,
            timestamp_epoch_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn result_count(&self) -> usize {
        if self.rerank_fallback {
            self.fused.len()
        } else {
            self.reranked.len()
        }
    }
}

/// Append-only query log shared by concurrent retrieval workers.
#[derive(Debug)]
pub struct QueryLog {
    entries: Mutex<Vec<QueryLogEntry>>,
    /// Maximum entries to retain (ring buffer behavior).
    max_entries: usize,
}

impl Default for QueryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryLog {
    pub fn new() -> Self {
        Self::with_capacity(50_000)
    }

    /// Create with a custom capacity.
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            max_entries: max_entries.max(1),
        }
    }

    /// Record a query.
    pub fn record(&self, entry: QueryLogEntry) {
        tracing::debug!(
            event = "query_logged",
            query = %entry.query,
            latency_ms = entry.latency_ms,
            result_count = entry.result_count(),
            rerank_fallback = entry.rerank_fallback,
            "query logged"
        );

        let Ok(mut entries) = self.entries.lock() else {
            tracing::warn!("query log lock poisoned, dropping entry");
            return;
        };
        entries.push(entry);
        if entries.len() > self.max_entries {
            let excess = entries.len() - self.max_entries;
            entries.drain(..excess);
        }
    }

    /// Snapshot of all entries, oldest first.
    pub fn entries(&self) -> Vec<QueryLogEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Total number of retained queries.
    pub fn count(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Average latency across all logged queries.
    pub fn avg_latency(&self) -> Duration {
        let entries = self.entries();
        if entries.is_empty() {
            return Duration::ZERO;
        }
        let total: u64 = entries.iter().map(|e| e.latency_ms).sum();
        Duration::from_millis(total / entries.len() as u64)
    }

    /// Latency at the given percentile (0.0–1.0).
    pub fn latency_percentile(&self, p: f64) -> Duration {
        let mut latencies: Vec<u64> = self.entries().iter().map(|e| e.latency_ms).collect();
        if latencies.is_empty() {
            return Duration::ZERO;
        }
        latencies.sort_unstable();
        let idx = ((p.clamp(0.0, 1.0) * (latencies.len() - 1) as f64).round() as usize)
            .min(latencies.len() - 1);
        Duration::from_millis(latencies[idx])
    }

    /// Share of queries that fell back to unreranked fused candidates.
    pub fn fallback_rate(&self) -> f64 {
        let entries = self.entries();
        if entries.is_empty() {
            return 0.0;
        }
        entries.iter().filter(|e| e.rerank_fallback).count() as f64 / entries.len() as f64
    }

    /// Write all entries as a JSON array.
    pub fn write_json(&self, path: &Path) -> QuillResult<()> {
        let json = serde_json::to_string_pretty(&self.entries())?;
        std::fs::write(path, json).map_err(|source| QuillError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

impl IQueryLogger for QueryLog {
    fn log_query(&self, trace: QueryTrace) {
        self.record(QueryLogEntry::from_trace(trace));
    }
}
