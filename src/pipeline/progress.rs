use serde::{Deserialize, Serialize};

use crate::constants::{
    DONE_PROGRESS, SCORING_PROGRESS_SPAN, SCORING_PROGRESS_START, SCRAPING_PROGRESS_SPAN,
};
use crate::ranking::RankingReport;

/// Pipeline phase, in emission order. `Error` may replace any pending event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Scraping,
    Scoring,
    Done,
    Error,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Done | Phase::Error)
    }
}

/// One status update of a streaming run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub phase: Phase,
    /// Candidate being worked on; absent on terminal events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subreddit: Option<String>,
    /// Percentage in `0..=100`, non-decreasing across a stream.
    pub progress: u8,
    pub message: String,
    /// The ranked batch; only on `done`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<RankingReport>,
}

impl ProgressEvent {
    /// Emitted as the fetch of candidate `index` of `total` begins.
    pub fn scraping(name: &str, index: usize, total: usize) -> Self {
        Self {
            phase: Phase::Scraping,
            subreddit: Some(name.to_string()),
            progress: scraping_progress(index, total),
            message: format!("Scraping r/{}... ({}/{})", name, index + 1, total),
            result: None,
        }
    }

    /// Emitted as the scoring of candidate `index` of `total` begins.
    pub fn scoring(name: &str, index: usize, total: usize) -> Self {
        Self {
            phase: Phase::Scoring,
            subreddit: Some(name.to_string()),
            progress: scoring_progress(index, total),
            message: format!("Scoring r/{}... ({}/{})", name, index + 1, total),
            result: None,
        }
    }

    pub fn done(report: RankingReport) -> Self {
        Self {
            phase: Phase::Done,
            subreddit: None,
            progress: DONE_PROGRESS,
            message: "Analysis complete".to_string(),
            result: Some(report),
        }
    }

    /// Terminal failure; carries no partial results.
    pub fn error(message: impl Into<String>, progress: u8) -> Self {
        Self {
            phase: Phase::Error,
            subreddit: None,
            progress,
            message: message.into(),
            result: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Renders a text-event-stream frame: `data: <json>\n\n`.
    pub fn to_sse_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self).map(|json| format!("data: {json}\n\n"))
    }
}

/// `floor(index / total * 60)`.
pub fn scraping_progress(index: usize, total: usize) -> u8 {
    scaled(index, total, SCRAPING_PROGRESS_SPAN)
}

/// `60 + floor(index / total * 35)`.
pub fn scoring_progress(index: usize, total: usize) -> u8 {
    SCORING_PROGRESS_START + scaled(index, total, SCORING_PROGRESS_SPAN)
}

fn scaled(index: usize, total: usize, span: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    // index < total, so the result is below span (at most 60).
    ((index.min(total) * span) / total) as u8
}
