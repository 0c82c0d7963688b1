use serde::{Deserialize, Serialize};

use crate::constants::POLICY_FALLBACK_SCORE;

/// Unscaled per-candidate signals, before batch normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawSignals {
    /// Cosine similarity, in `[-1, 1]`.
    pub semantic: f64,
    /// Policy tolerance, in `[0, 1]`.
    pub tolerance: f64,
    /// `ln(median upvotes + 1)`, in `[0, inf)`.
    pub activity: f64,
}

impl RawSignals {
    pub fn new(semantic: f64, tolerance: f64, activity: f64) -> Self {
        Self {
            semantic,
            tolerance,
            activity,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Outcome of policy scoring for one candidate.
pub enum PolicyVerdict {
    /// The provider produced a usable score.
    Rated {
        /// Score in `[0, 1]`.
        score: f64,
        /// `true` if the provider's value was outside `[0, 1]` and got clamped.
        clamped: bool,
    },
    /// The provider failed or its reply was unusable; the conservative default applies.
    Fallback {
        /// Why the reply was rejected.
        reason: String,
    },
}

impl PolicyVerdict {
    /// Builds a verdict from a finite provider value, clamping into `[0, 1]`.
    pub fn from_value(value: f64) -> Self {
        let score = value.clamp(0.0, 1.0);
        PolicyVerdict::Rated {
            score,
            clamped: score != value,
        }
    }

    /// The score to rank with.
    pub fn score(&self) -> f64 {
        match self {
            PolicyVerdict::Rated { score, .. } => *score,
            PolicyVerdict::Fallback { .. } => POLICY_FALLBACK_SCORE,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, PolicyVerdict::Fallback { .. })
    }

    pub fn debug_status(&self) -> &'static str {
        match self {
            PolicyVerdict::Rated { clamped: false, .. } => "RATED",
            PolicyVerdict::Rated { clamped: true, .. } => "CLAMPED",
            PolicyVerdict::Fallback { .. } => "FALLBACK",
        }
    }
}
