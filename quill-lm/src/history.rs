//! Per-call language-model history.

use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use chrono::{DateTime, Utc};
use quill_core::errors::{QuillError, QuillResult};
use quill_core::models::{CallKind, LmRequest};
use quill_core::traits::ILanguageModel;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One recorded call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRecord {
    pub kind: CallKind,
    pub role: String,
    pub model: String,
    pub prompt: String,
    pub response: Option<String>,
    pub error: Option<String>,
    pub latency_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// Append-only call log shared by every role's model.
#[derive(Debug, Default)]
pub struct CallHistory {
    records: Mutex<Vec<CallRecord>>,
}

impl CallHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, record: CallRecord) {
        match self.records.lock() {
            Ok(mut records) => records.push(record),
            Err(_) => warn!("call history lock poisoned, dropping record"),
        }
    }

    pub fn snapshot(&self) -> Vec<CallRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write one JSON object per line.
    pub fn write_jsonl(&self, path: &Path) -> QuillResult<()> {
        let io_err = |source| QuillError::Io {
            path: path.display().to_string(),
            source,
        };
        let mut file = std::fs::File::create(path).map_err(io_err)?;
        for record in self.snapshot() {
            let line = serde_json::to_string(&record)?;
            writeln!(file, "{line}").map_err(io_err)?;
        }
        Ok(())
    }
}

/// Decorator that records every call of the wrapped model.
pub struct RecordingModel {
    inner: Arc<dyn ILanguageModel>,
    role: String,
    history: Arc<CallHistory>,
}

impl RecordingModel {
    pub fn new(
        inner: Arc<dyn ILanguageModel>,
        role: impl Into<String>,
        history: Arc<CallHistory>,
    ) -> Self {
        Self {
            inner,
            role: role.into(),
            history,
        }
    }
}

impl ILanguageModel for RecordingModel {
    fn generate(&self, request: &LmRequest) -> QuillResult<String> {
        let started = Instant::now();
        let result = self.inner.generate(request);
        let latency_ms = started.elapsed().as_millis() as u64;

        debug!(
            role = %self.role,
            kind = request.kind.as_str(),
            latency_ms,
            ok = result.is_ok(),
            "language model call"
        );

        self.history.push(CallRecord {
            kind: request.kind,
            role: self.role.clone(),
            model: self.inner.model_name().to_string(),
            prompt: format!("{}\n\n{}", request.instructions, request.render_prompt()),
            response: result.as_ref().ok().cloned(),
            error: result.as_ref().err().map(|e| e.to_string()),
            latency_ms,
            timestamp: Utc::now(),
        });
        result
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
