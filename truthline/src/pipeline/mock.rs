//! Deterministic stand-ins for the external providers.

use crate::error::{LlmError, SearchError};
use crate::models::SourceRef;
use crate::pipeline::traits::{ChatMessage, LanguageModel, SearchBackend};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Replies chosen by substring match against the last message of the request.
///
/// Rules are checked in insertion order; the first matching needle wins.
/// Without a match the default reply is returned.
pub struct ScriptedModel {
    rules: Vec<(String, Reply)>,
    default: Reply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

#[derive(Clone)]
enum Reply {
    Text(String),
    Fail,
}

impl ScriptedModel {
    pub fn new(default_reply: impl Into<String>) -> Self {
        Self {
            rules: Vec::new(),
            default: Reply::Text(default_reply.into()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A model whose every call fails.
    pub fn failing() -> Self {
        Self {
            default: Reply::Fail,
            ..Self::new("")
        }
    }

    pub fn on(mut self, needle: impl Into<String>, reply: impl Into<String>) -> Self {
        self.rules.push((needle.into(), Reply::Text(reply.into())));
        self
    }

    pub fn fail_on(mut self, needle: impl Into<String>) -> Self {
        self.rules.push((needle.into(), Reply::Fail));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock").clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let prompt = messages.last().map(|m| m.content.clone()).unwrap_or_default();
        self.prompts.lock().expect("prompts lock").push(prompt.clone());

        let reply = self
            .rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.default.clone());

        match reply {
            Reply::Text(text) => Ok(text),
            Reply::Fail => Err(LlmError::Request {
                message: "scripted failure".to_string(),
            }),
        }
    }
}

/// Returns the same result list for every query.
pub struct StaticSearch {
    results: Vec<SourceRef>,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl StaticSearch {
    pub fn new<I, S>(results: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            results: results.into_iter().map(SourceRef::new).collect(),
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().expect("queries lock").clone()
    }
}

#[async_trait]
impl SearchBackend for StaticSearch {
    async fn lookup(&self, query: &str) -> Result<Vec<SourceRef>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().expect("queries lock").push(query.to_string());
        Ok(self.results.clone())
    }
}

/// Fails every lookup, as an unreachable provider would.
#[derive(Default)]
pub struct FailingSearch {
    calls: AtomicUsize,
}

impl FailingSearch {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchBackend for FailingSearch {
    async fn lookup(&self, _query: &str) -> Result<Vec<SourceRef>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SearchError::Status(503))
    }
}
