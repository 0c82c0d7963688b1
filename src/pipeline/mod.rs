//! Ranking runs: fetch, score, normalise, rank.
//!
//! [`RankingEngine::rank`] returns the report directly. [`RankingEngine::rank_stream`]
//! yields [`ProgressEvent`]s (`scraping`, `scoring`, then one `done` or `error`);
//! its `done` payload equals what `rank` returns for the same inputs.

pub mod engine;
pub mod error;
pub mod progress;

#[cfg(test)]
mod tests;

pub use engine::RankingEngine;
pub use error::PipelineError;
pub use progress::{Phase, ProgressEvent, scoring_progress, scraping_progress};
