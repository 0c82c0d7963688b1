use tracing::warn;

use crate::candidate::{Candidate, RecentItem};

use super::error::FetchError;

/// Result of one sub-fetch: data, or the reason the facet degraded to its default.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    Fetched(T),
    Unavailable(FetchError),
}

impl<T> FetchOutcome<T> {
    pub fn is_fetched(&self) -> bool {
        matches!(self, FetchOutcome::Fetched(_))
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchOutcome::Fetched(_) => None,
            FetchOutcome::Unavailable(err) => Some(err),
        }
    }
}

impl<T: Default> FetchOutcome<T> {
    /// Collapses an unavailable facet to its empty default.
    pub fn into_value_or_default(self) -> T {
        match self {
            FetchOutcome::Fetched(value) => value,
            FetchOutcome::Unavailable(_) => T::default(),
        }
    }
}

/// Fields read from a candidate's about record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AboutRecord {
    pub description: String,
    pub subscribers: u64,
    pub active_users: u64,
}

/// The three independently fetched facets of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    About,
    Rules,
    RecentItems,
}

impl Facet {
    pub fn as_str(&self) -> &'static str {
        match self {
            Facet::About => "about",
            Facet::Rules => "rules",
            Facet::RecentItems => "recent_items",
        }
    }
}

impl std::fmt::Display for Facet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fetched candidate plus the facets that fell back to defaults.
#[derive(Debug, Clone)]
pub struct CandidateFetch {
    pub candidate: Candidate,
    pub degraded: Vec<Facet>,
}

impl CandidateFetch {
    /// Builds a candidate from its facets, substituting defaults for unavailable ones.
    pub fn assemble(
        name: &str,
        about: FetchOutcome<AboutRecord>,
        rules: FetchOutcome<Vec<String>>,
        recent_items: FetchOutcome<Vec<RecentItem>>,
    ) -> Self {
        let mut degraded = Vec::new();
        for (facet, err) in [
            (Facet::About, about.error()),
            (Facet::Rules, rules.error()),
            (Facet::RecentItems, recent_items.error()),
        ] {
            if let Some(err) = err {
                warn!(candidate = %name, facet = %facet, error = %err, "Facet unavailable, using defaults");
                degraded.push(facet);
            }
        }

        let about = about.into_value_or_default();
        let candidate = Candidate {
            name: name.to_string(),
            description: about.description,
            subscribers: about.subscribers,
            active_users: about.active_users,
            rules: rules.into_value_or_default(),
            recent_items: recent_items.into_value_or_default(),
        };

        Self {
            candidate,
            degraded,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.degraded.is_empty()
    }
}
