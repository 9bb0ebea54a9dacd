//! Scripted completion backend for tests.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use super::backend::CompletionBackend;
use super::error::{GenerationError, GenerationResult};
use super::options::ModelOptions;

/// One scripted backend reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Fail(String),
}

#[derive(Debug, Default)]
struct MockState {
    script: VecDeque<MockReply>,
    fallback: Option<MockReply>,
    prompts: Vec<String>,
}

/// Completion backend that replays scripted replies and records every prompt.
///
/// Clones share state, so a test can keep a handle while the pipeline owns another.
#[derive(Debug, Clone, Default)]
pub struct MockCompletionBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockCompletionBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that answers every call with `text`.
    pub fn always(text: impl Into<String>) -> Self {
        let backend = Self::new();
        backend.state.lock().fallback = Some(MockReply::Text(text.into()));
        backend
    }

    /// Backend that answers every call with a `{"generated_sql": ...}` envelope.
    pub fn always_query(generated: &str) -> Self {
        Self::always(envelope(generated))
    }

    /// Backend that fails every call.
    pub fn failing(message: impl Into<String>) -> Self {
        let backend = Self::new();
        backend.state.lock().fallback = Some(MockReply::Fail(message.into()));
        backend
    }

    /// Queues a reply consumed before the fallback.
    pub fn push_reply(&self, reply: MockReply) -> &Self {
        self.state.lock().script.push_back(reply);
        self
    }

    pub fn push_text(&self, text: impl Into<String>) -> &Self {
        self.push_reply(MockReply::Text(text.into()))
    }

    pub fn push_query(&self, generated: &str) -> &Self {
        self.push_text(envelope(generated))
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().prompts.len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.state.lock().prompts.clone()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.state.lock().prompts.last().cloned()
    }
}

impl CompletionBackend for MockCompletionBackend {
    async fn complete(&self, prompt: &str, _options: &ModelOptions) -> GenerationResult<String> {
        let reply = {
            let mut state = self.state.lock();
            state.prompts.push(prompt.to_string());
            state
                .script
                .pop_front()
                .or_else(|| state.fallback.clone())
        };

        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Fail(message)) => Err(GenerationError::backend(message)),
            None => Err(GenerationError::backend("mock backend has no scripted reply")),
        }
    }
}

/// Wraps query text in the JSON envelope the generator expects.
pub fn envelope(generated: &str) -> String {
    serde_json::json!({ "generated_sql": generated }).to_string()
}
