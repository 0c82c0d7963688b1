use serde::{Deserialize, Serialize};

use crate::candidate::{Candidate, RecentItem};

/// The three weighted components of a final score.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Batch-normalised semantic similarity.
    pub semantic: f64,
    /// Raw policy tolerance (already in `[0, 1]`).
    pub tolerance: f64,
    /// Batch-normalised activity.
    pub activity: f64,
}

/// One ranked candidate, with its fetched data for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub name: String,
    pub final_score: f64,
    pub breakdown: ScoreBreakdown,
    pub subscribers: u64,
    pub active_users: u64,
    pub description: String,
    pub rules: Vec<String>,
    pub recent_items: Vec<RecentItem>,
}

impl RankedResult {
    pub fn new(candidate: Candidate, breakdown: ScoreBreakdown, final_score: f64) -> Self {
        Self {
            name: candidate.name,
            final_score,
            breakdown,
            subscribers: candidate.subscribers,
            active_users: candidate.active_users,
            description: candidate.description,
            rules: candidate.rules,
            recent_items: candidate.recent_items,
        }
    }
}

/// Consumer-facing ranking payload, descending by `final_score`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RankingReport {
    pub results: Vec<RankedResult>,
    pub total: usize,
}

impl RankingReport {
    pub fn new(results: Vec<RankedResult>) -> Self {
        let total = results.len();
        Self { results, total }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Names in ranked order.
    pub fn names(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn top(&self) -> Option<&RankedResult> {
        self.results.first()
    }
}
