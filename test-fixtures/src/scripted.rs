use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use quill_core::errors::{LanguageModelError, QuillResult};
use quill_core::models::{CallKind, LmRequest};
use quill_core::traits::ILanguageModel;

type Handler = Box<dyn Fn(&LmRequest) -> Option<String> + Send + Sync>;

/// Language model that answers from scripts.
///
/// Resolution order per call: the handler (if it returns `Some`), then the
/// FIFO queue for the call kind, then the sticky reply for the call kind.
/// With none of those the call fails with an empty-completion error.
#[derive(Default)]
pub struct ScriptedModel {
    queued: Mutex<HashMap<CallKind, VecDeque<String>>>,
    sticky: HashMap<CallKind, String>,
    handler: Option<Handler>,
    calls: Mutex<Vec<LmRequest>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one reply for `kind`.
    pub fn respond(self, kind: CallKind, reply: impl Into<String>) -> Self {
        if let Ok(mut queued) = self.queued.lock() {
            queued.entry(kind).or_default().push_back(reply.into());
        }
        self
    }

    /// Reply to every `kind` call that has nothing queued.
    pub fn always(mut self, kind: CallKind, reply: impl Into<String>) -> Self {
        self.sticky.insert(kind, reply.into());
        self
    }

    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&LmRequest) -> Option<String> + Send + Sync + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Every request received so far.
    pub fn calls(&self) -> Vec<LmRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn calls_of(&self, kind: CallKind) -> Vec<LmRequest> {
        self.calls().into_iter().filter(|c| c.kind == kind).collect()
    }
}

impl ILanguageModel for ScriptedModel {
    fn generate(&self, request: &LmRequest) -> QuillResult<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }
        if let Some(reply) = self.handler.as_ref().and_then(|h| h(request)) {
            return Ok(reply);
        }
        let queued = self
            .queued
            .lock()
            .ok()
            .and_then(|mut q| q.get_mut(&request.kind).and_then(VecDeque::pop_front));
        if let Some(reply) = queued.or_else(|| self.sticky.get(&request.kind).cloned()) {
            return Ok(reply);
        }
        Err(LanguageModelError::EmptyCompletion {
            model: format!("scripted:{}", request.kind.as_str()),
        }
        .into())
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
