//! Cross-cutting, shared constants.
//!
//! # Weight Invariants
//!
//! The final score is a convex combination of the three signals. [`RankWeights::DEFAULT`]
//! is the deployed configuration; alternative weights must pass
//! [`RankWeights::validate`] before a ranking run accepts them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identifying header sent with every data-source request.
pub const DEFAULT_USER_AGENT: &str = "LexTrackAI_Hackathon_Bot_v1.0 (by /u/lextrack_ai)";

/// Public read-only data source.
pub const DEFAULT_SOURCE_URL: &str = "https://www.reddit.com";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Minimum pause after a successful data-source call.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(1500);

pub const DEFAULT_RECENT_ITEM_LIMIT: u32 = 5;
pub const MAX_RECENT_ITEM_LIMIT: u32 = 100;

/// Output dimension of all-MiniLM-L6-v2.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;
pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

pub const DEFAULT_POLICY_MODEL: &str = "claude-haiku-4-5-20251001";
pub const DEFAULT_POLICY_MAX_TOKENS: u32 = 150;

/// Score assumed when the policy provider's answer cannot be used.
pub const POLICY_FALLBACK_SCORE: f64 = 0.0;

/// Value assigned to every candidate when a signal has no spread.
pub const FLAT_SIGNAL_SCORE: f64 = 0.5;

pub const SCRAPING_PROGRESS_SPAN: usize = 60;
pub const SCORING_PROGRESS_START: u8 = 60;
pub const SCORING_PROGRESS_SPAN: usize = 35;
pub const DONE_PROGRESS: u8 = 100;

/// Capacity of the channel between the pipeline task and a streaming consumer.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 16;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Relative weight of each signal in the final score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankWeights {
    pub semantic: f64,
    pub tolerance: f64,
    pub activity: f64,
}

impl Default for RankWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl RankWeights {
    pub const DEFAULT: Self = Self {
        semantic: 0.55,
        tolerance: 0.25,
        activity: 0.20,
    };

    pub fn new(semantic: f64, tolerance: f64, activity: f64) -> Self {
        Self {
            semantic,
            tolerance,
            activity,
        }
    }

    /// Returns an error if any weight is negative or non-finite, or if they do not sum to 1.
    pub fn validate(&self) -> Result<(), WeightValidationError> {
        for (name, value) in [
            ("semantic", self.semantic),
            ("tolerance", self.tolerance),
            ("activity", self.activity),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(WeightValidationError::InvalidWeight { name, value });
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightValidationError::BadSum { sum });
        }
        Ok(())
    }

    pub fn sum(&self) -> f64 {
        self.semantic + self.tolerance + self.activity
    }

    /// Weighted sum of the three signal values.
    pub fn combine(&self, semantic: f64, tolerance: f64, activity: f64) -> f64 {
        semantic * self.semantic + tolerance * self.tolerance + activity * self.activity
    }
}

/// Error returned when weight validation fails.
#[derive(Debug, Clone, PartialEq)]
pub enum WeightValidationError {
    /// A weight is negative, NaN or infinite.
    InvalidWeight { name: &'static str, value: f64 },
    /// Weights do not add up to 1.0.
    BadSum { sum: f64 },
}

impl std::fmt::Display for WeightValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWeight { name, value } => {
                write!(f, "{} weight must be finite and non-negative, got {}", name, value)
            }
            Self::BadSum { sum } => write!(f, "weights must sum to 1.0, got {}", sum),
        }
    }
}

impl std::error::Error for WeightValidationError {}
