//! In-memory [`CandidateSource`] for tests and offline runs.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::candidate::{Candidate, RecentItem};

use super::CandidateSource;
use super::error::FetchError;
use super::types::{AboutRecord, Facet, FetchOutcome};

/// Serves pre-built candidates; unknown names degrade every facet.
#[derive(Debug, Default)]
pub struct StaticCandidateSource {
    candidates: HashMap<String, Candidate>,
    latency: Duration,
    calls: Mutex<Vec<(String, Facet)>>,
}

impl StaticCandidateSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_candidate(mut self, candidate: Candidate) -> Self {
        self.candidates.insert(candidate.name.clone(), candidate);
        self
    }

    pub fn with_candidates<I: IntoIterator<Item = Candidate>>(mut self, candidates: I) -> Self {
        for candidate in candidates {
            self.candidates.insert(candidate.name.clone(), candidate);
        }
        self
    }

    /// Simulated per-facet network latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Every facet request seen so far, in order.
    pub fn calls(&self) -> Vec<(String, Facet)> {
        self.calls.lock().clone()
    }

    /// Distinct candidate names requested, in first-request order.
    pub fn requested_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for (name, _) in self.calls.lock().iter() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }

    async fn lookup(&self, name: &str, facet: Facet) -> Result<&Candidate, FetchError> {
        self.calls.lock().push((name.to_string(), facet));
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.candidates.get(name).ok_or_else(|| FetchError::Missing {
            name: name.to_string(),
        })
    }
}

#[async_trait]
impl CandidateSource for StaticCandidateSource {
    async fn fetch_about(&self, name: &str) -> FetchOutcome<AboutRecord> {
        match self.lookup(name, Facet::About).await {
            Ok(c) => FetchOutcome::Fetched(AboutRecord {
                description: c.description.clone(),
                subscribers: c.subscribers,
                active_users: c.active_users,
            }),
            Err(err) => FetchOutcome::Unavailable(err),
        }
    }

    async fn fetch_rules(&self, name: &str) -> FetchOutcome<Vec<String>> {
        match self.lookup(name, Facet::Rules).await {
            Ok(c) => FetchOutcome::Fetched(c.rules.clone()),
            Err(err) => FetchOutcome::Unavailable(err),
        }
    }

    async fn fetch_recent_items(&self, name: &str) -> FetchOutcome<Vec<RecentItem>> {
        match self.lookup(name, Facet::RecentItems).await {
            Ok(c) => FetchOutcome::Fetched(c.recent_items.clone()),
            Err(err) => FetchOutcome::Unavailable(err),
        }
    }
}
