//! Candidate communities and their fetched metadata.
//!
//! A [`Candidate`] is built once per ranking run from fetched data and is not shared
//! across runs. Names are normalised with [`normalize_name`] before any lookup.

pub mod types;


pub use types::{Candidate, RecentItem};

/// Strips whitespace, a leading `/r/` or `r/` prefix, and surrounding slashes.
///
/// Returns `None` when nothing remains.
pub fn normalize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('/');
    let without_prefix = trimmed
        .strip_prefix("r/")
        .or_else(|| trimmed.strip_prefix("R/"))
        .unwrap_or(trimmed);
    let name = without_prefix.trim_matches('/').trim();

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Normalises every name and drops empties and repeats (first occurrence wins).
pub fn dedupe_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = std::collections::HashSet::new();
    names
        .into_iter()
        .filter_map(|raw| normalize_name(raw.as_ref()))
        .filter(|name| seen.insert(name.to_ascii_lowercase()))
        .collect()
}
