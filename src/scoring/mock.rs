//! Scripted [`CompletionProvider`] for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::PolicyError;
use super::policy::{CompletionProvider, PolicyPrompt};

#[derive(Debug, Clone)]
enum Script {
    Reply(String),
    Fail(String),
}

/// Answers with canned text per candidate; unscripted candidates get the default reply.
#[derive(Debug)]
pub struct ScriptedCompletionProvider {
    scripts: HashMap<String, Script>,
    default_reply: String,
    prompts: Mutex<Vec<PolicyPrompt>>,
}

impl Default for ScriptedCompletionProvider {
    fn default() -> Self {
        Self {
            scripts: HashMap::new(),
            default_reply: "\"tolerance_score\": 0.5}".to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedCompletionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replies to `candidate` with `{"tolerance_score": score}`.
    pub fn with_score(self, candidate: impl Into<String>, score: f64) -> Self {
        self.with_reply(candidate, format!("\"tolerance_score\": {score}}}"))
    }

    /// Replies to `candidate` with raw text (as if continuing after the prefill).
    pub fn with_reply(mut self, candidate: impl Into<String>, reply: impl Into<String>) -> Self {
        self.scripts
            .insert(candidate.into(), Script::Reply(reply.into()));
        self
    }

    /// Fails every request for `candidate`.
    pub fn with_failure(mut self, candidate: impl Into<String>, reason: impl Into<String>) -> Self {
        self.scripts
            .insert(candidate.into(), Script::Fail(reason.into()));
        self
    }

    pub fn with_default_reply(mut self, reply: impl Into<String>) -> Self {
        self.default_reply = reply.into();
        self
    }

    /// Every prompt received so far, in order.
    pub fn prompts(&self) -> Vec<PolicyPrompt> {
        self.prompts.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletionProvider {
    async fn complete(&self, prompt: &PolicyPrompt) -> Result<String, PolicyError> {
        self.prompts.lock().push(prompt.clone());

        match self.scripts.get(&prompt.candidate) {
            Some(Script::Reply(reply)) => Ok(reply.clone()),
            Some(Script::Fail(reason)) => Err(PolicyError::Provider {
                candidate: prompt.candidate.clone(),
                reason: reason.clone(),
            }),
            None => Ok(self.default_reply.clone()),
        }
    }
}
