//! Batch normalisation and weighted ranking.
//!
//! Semantic and activity signals are min-max scaled across the current batch only;
//! the policy signal is used raw. Scores from different runs are not comparable.

pub mod normalize;
pub mod types;


pub use normalize::min_max_scale;
pub use types::{RankedResult, RankingReport, ScoreBreakdown};

use std::cmp::Ordering;

use tracing::debug;

use crate::candidate::Candidate;
use crate::constants::RankWeights;
use crate::scoring::RawSignals;

/// Normalises, weights and sorts a batch (descending, stable on ties).
///
/// Input order is the tie-break order.
pub fn rank_candidates(
    scored: Vec<(Candidate, RawSignals)>,
    weights: &RankWeights,
) -> Vec<RankedResult> {
    if scored.is_empty() {
        return Vec::new();
    }

    let semantic: Vec<f64> = scored.iter().map(|(_, raw)| raw.semantic).collect();
    let activity: Vec<f64> = scored.iter().map(|(_, raw)| raw.activity).collect();
    let semantic = min_max_scale(&semantic);
    let activity = min_max_scale(&activity);

    let mut results: Vec<RankedResult> = scored
        .into_iter()
        .zip(semantic.into_iter().zip(activity))
        .map(|((candidate, raw), (semantic, activity))| {
            let breakdown = ScoreBreakdown {
                semantic,
                tolerance: raw.tolerance,
                activity,
            };
            let final_score = weights.combine(semantic, raw.tolerance, activity);
            RankedResult::new(candidate, breakdown, final_score)
        })
        .collect();

    // sort_by is stable; equal scores keep input order.
    results.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(Ordering::Equal)
    });

    debug!(
        candidates = results.len(),
        top = results.first().map(|r| r.name.as_str()).unwrap_or_default(),
        "Ranking complete"
    );

    results
}
