//! Scout library crate (used by the `scout` binary and integration tests).
//!
//! Ranks candidate communities for a product launch. Each run fetches live public
//! metadata for every candidate, derives three signals, normalises them across the
//! batch and returns a weighted ranking.
//!
//! # Public API Surface
//!
//! ## Pipeline
//! - [`RankingEngine`] - `rank` (one-shot) and `rank_stream` (progress events)
//! - [`ProgressEvent`], [`Phase`] - streaming protocol
//! - [`RankingReport`], [`RankedResult`], [`ScoreBreakdown`] - consumer payload
//!
//! ## Collaborators
//! - [`CandidateSource`], [`HttpCandidateSource`] - candidate metadata
//! - [`TextEmbedder`], [`SentenceEmbedder`] - embeddings (model or stub)
//! - [`CompletionProvider`], [`GenaiCompletionProvider`] - policy scoring backend
//!
//! ## Configuration
//! - [`Config`], [`ConfigError`] - `SCOUT_*` environment configuration
//! - [`RankWeights`] - signal weights
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod candidate;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod fetcher;
pub mod pipeline;
pub mod ranking;
pub mod scoring;

pub use candidate::{Candidate, RecentItem, dedupe_names, normalize_name};
pub use config::{Config, ConfigError};
pub use constants::{RankWeights, WeightValidationError};
pub use embedding::{
    EmbedderConfig, EmbeddingError, SENTENCE_EMBEDDING_DIM, SentenceEmbedder, TextEmbedder,
    cosine_similarity,
};
#[cfg(any(test, feature = "mock"))]
pub use fetcher::StaticCandidateSource;
pub use fetcher::{
    AboutRecord, CandidateFetch, CandidateSource, Facet, FetchError, FetchOutcome,
    HttpCandidateSource, RequestPacer,
};
pub use pipeline::{Phase, PipelineError, ProgressEvent, RankingEngine};
pub use ranking::{RankedResult, RankingReport, ScoreBreakdown, min_max_scale, rank_candidates};
#[cfg(any(test, feature = "mock"))]
pub use scoring::ScriptedCompletionProvider;
pub use scoring::{
    CompletionProvider, GenaiCompletionProvider, NeutralCompletionProvider, PolicyError,
    PolicyPrompt, PolicyScorer, PolicyVerdict, RawSignals, SemanticScorer, activity_score,
};
