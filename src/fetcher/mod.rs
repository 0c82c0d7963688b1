//! Candidate fetching from the external read-only data source.
//!
//! Each candidate is assembled from three independent facets (about, rules, recent
//! items). A facet that cannot be fetched degrades to its empty default and is reported
//! in [`CandidateFetch::degraded`]; it never fails the candidate or the run.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod pacing;
pub mod parse;
pub mod types;


pub use client::HttpCandidateSource;
pub use error::FetchError;
#[cfg(any(test, feature = "mock"))]
pub use mock::StaticCandidateSource;
pub use pacing::RequestPacer;
pub use types::{AboutRecord, CandidateFetch, Facet, FetchOutcome};

use async_trait::async_trait;
use tracing::debug;

use crate::candidate::RecentItem;

#[async_trait]
/// Source of candidate metadata.
pub trait CandidateSource: Send + Sync {
    /// Description and member counts.
    async fn fetch_about(&self, name: &str) -> FetchOutcome<AboutRecord>;
    /// Community rules, in source order.
    async fn fetch_rules(&self, name: &str) -> FetchOutcome<Vec<String>>;
    /// Recent non-pinned items, in listing order.
    async fn fetch_recent_items(&self, name: &str) -> FetchOutcome<Vec<RecentItem>>;

    /// Fetches all facets (about, rules, recent items, in that order).
    async fn fetch_candidate(&self, name: &str) -> CandidateFetch {
        debug!(candidate = %name, "Fetching candidate");
        let about = self.fetch_about(name).await;
        let rules = self.fetch_rules(name).await;
        let recent_items = self.fetch_recent_items(name).await;
        CandidateFetch::assemble(name, about, rules, recent_items)
    }
}
