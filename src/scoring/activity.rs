use crate::candidate::Candidate;

/// Median of the counts; the mean of the two middle values for even lengths, `0.0` when empty.
pub fn median(values: &[u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
    } else {
        sorted[mid] as f64
    }
}

/// `ln(median(upvotes) + 1)` over the candidate's recent items.
pub fn activity_score(candidate: &Candidate) -> f64 {
    (median(&candidate.upvote_counts()) + 1.0).ln()
}
