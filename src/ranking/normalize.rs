use crate::constants::FLAT_SIGNAL_SCORE;

/// Min-max scales `values` into `[0, 1]`, preserving order.
///
/// A batch whose values are all equal maps every entry to `0.5`.
pub fn min_max_scale(values: &[f64]) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };

    let (min, max) = values
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    if max == min {
        return vec![FLAT_SIGNAL_SCORE; values.len()];
    }

    let range = max - min;
    values.iter().map(|&v| (v - min) / range).collect()
}
