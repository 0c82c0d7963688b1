use std::sync::Arc;

use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use serde_json::Value;
use tracing::{debug, warn};

use crate::candidate::Candidate;
use crate::config::Config;

use super::error::PolicyError;
use super::types::PolicyVerdict;

/// Rubric given to the completion model as its system message.
pub const POLICY_RUBRIC: &str = "You are an AI community guidelines analyzer. Read the provided subreddit description and rules.
Rate the subreddit's tolerance for self-promotion, marketing, or sharing new products on a scale from 0.0 to 1.0.
0.0 = Strictly forbids all self-promotion, marketing, or links. Instant ban risk.
0.5 = Allows it conditionally (e.g., only in specific megathreads, or requires high participation first).
1.0 = Openly encourages sharing projects, self-promotion, or has absolutely no rules against it.

Output STRICTLY as a JSON object with a single key \"tolerance_score\" containing the float value.";

/// Assistant prefill; replies continue an already-open JSON object.
pub const REPLY_PREFILL: &str = "{";

const SCORE_KEY: &str = "tolerance_score";

/// One policy-scoring request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyPrompt {
    pub candidate: String,
    pub system: String,
    pub user: String,
}

impl PolicyPrompt {
    pub fn for_candidate(candidate: &Candidate) -> Self {
        // Vec<String> always serialises.
        let rules = serde_json::to_string(&candidate.rules).unwrap_or_else(|_| "[]".to_string());
        Self {
            candidate: candidate.name.clone(),
            system: POLICY_RUBRIC.to_string(),
            user: format!(
                "Subreddit: {}\nDescription: {}\nRules: {}",
                candidate.name, candidate.description, rules
            ),
        }
    }
}

#[async_trait]
/// Text-completion backend for policy scoring.
pub trait CompletionProvider: Send + Sync {
    /// Returns the raw reply text (the continuation after [`REPLY_PREFILL`]).
    async fn complete(&self, prompt: &PolicyPrompt) -> Result<String, PolicyError>;
}

/// [`CompletionProvider`] backed by the `genai` multi-provider client.
pub struct GenaiCompletionProvider {
    client: Client,
    model: String,
    max_tokens: u32,
}

impl std::fmt::Debug for GenaiCompletionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiCompletionProvider")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl GenaiCompletionProvider {
    pub fn new(client: Client, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            client,
            model: model.into(),
            max_tokens,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Client::default(),
            config.policy_model.clone(),
            config.policy_max_tokens,
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(prompt: &PolicyPrompt) -> ChatRequest {
        ChatRequest::new(vec![
            ChatMessage::system(prompt.system.clone()),
            ChatMessage::user(prompt.user.clone()),
            ChatMessage::assistant(REPLY_PREFILL),
        ])
    }
}

#[async_trait]
impl CompletionProvider for GenaiCompletionProvider {
    async fn complete(&self, prompt: &PolicyPrompt) -> Result<String, PolicyError> {
        let options = ChatOptions::default().with_max_tokens(self.max_tokens);
        let response = self
            .client
            .exec_chat(&self.model, Self::build_request(prompt), Some(&options))
            .await
            .map_err(|e| PolicyError::Provider {
                candidate: prompt.candidate.clone(),
                reason: e.to_string(),
            })?;

        Ok(response.first_text().unwrap_or_default().to_string())
    }
}

/// Offline provider that rates every candidate as conditionally tolerant.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralCompletionProvider;

#[async_trait]
impl CompletionProvider for NeutralCompletionProvider {
    async fn complete(&self, _prompt: &PolicyPrompt) -> Result<String, PolicyError> {
        Ok("\"tolerance_score\": 0.5}".to_string())
    }
}

/// Turns a completion reply into a verdict. Never fails: unusable replies fall back.
pub fn interpret_reply(reply: &str) -> PolicyVerdict {
    match parse_tolerance(reply) {
        Ok(value) => PolicyVerdict::from_value(value),
        Err(err) => PolicyVerdict::Fallback {
            reason: err.to_string(),
        },
    }
}

/// Extracts the finite `tolerance_score` from a reply.
///
/// Accepts the reply as a JSON object, the reply after the `{` prefill, or the
/// span between the first `{` and last `}` of either. The score may be a number
/// or a numeric string.
pub fn parse_tolerance(reply: &str) -> Result<f64, PolicyError> {
    let trimmed = reply.trim();
    if trimmed.is_empty() {
        return Err(PolicyError::EmptyReply);
    }

    let object = parse_object(trimmed)?;
    let value = match object.get(SCORE_KEY) {
        Some(Value::Number(n)) => n.as_f64().ok_or(PolicyError::MissingScore)?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| PolicyError::MissingScore)?,
        _ => return Err(PolicyError::MissingScore),
    };

    if !value.is_finite() {
        return Err(PolicyError::NonFiniteScore { value });
    }

    Ok(value)
}

fn parse_object(text: &str) -> Result<serde_json::Map<String, Value>, PolicyError> {
    let prefilled = format!("{REPLY_PREFILL}{text}");
    let mut attempts = vec![text.to_string(), prefilled.clone()];
    attempts.extend(brace_span(text).map(str::to_string));
    attempts.extend(brace_span(&prefilled).map(str::to_string));

    let mut last_error = String::new();
    for attempt in &attempts {
        match serde_json::from_str::<Value>(attempt) {
            Ok(Value::Object(map)) => return Ok(map),
            Ok(other) => last_error = format!("expected object, got {other}"),
            Err(e) => last_error = e.to_string(),
        }
    }

    Err(PolicyError::MalformedReply { reason: last_error })
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Rates each candidate's tolerance for promotional posts.
#[derive(Clone)]
pub struct PolicyScorer {
    provider: Arc<dyn CompletionProvider>,
}

impl std::fmt::Debug for PolicyScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyScorer").finish_non_exhaustive()
    }
}

impl PolicyScorer {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// One fresh provider call per invocation; results are never cached.
    pub async fn score(&self, candidate: &Candidate) -> PolicyVerdict {
        let prompt = PolicyPrompt::for_candidate(candidate);

        let verdict = match self.provider.complete(&prompt).await {
            Ok(reply) => interpret_reply(&reply),
            Err(err) => PolicyVerdict::Fallback {
                reason: err.to_string(),
            },
        };

        match &verdict {
            PolicyVerdict::Fallback { reason } => {
                warn!(candidate = %candidate.name, reason = %reason, "Policy score unavailable, using fallback");
            }
            PolicyVerdict::Rated {
                score,
                clamped: true,
            } => {
                warn!(candidate = %candidate.name, score, "Policy score out of range, clamped");
            }
            PolicyVerdict::Rated { score, .. } => {
                debug!(candidate = %candidate.name, score, "Policy score computed");
            }
        }

        verdict
    }
}
