use serde::{Deserialize, Serialize};

/// A recent, non-pinned item from a candidate's hot listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecentItem {
    pub title: String,
    pub upvotes: u64,
    pub num_comments: u64,
    pub url: String,
}

impl RecentItem {
    pub fn new(title: impl Into<String>, upvotes: u64, num_comments: u64, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            upvotes,
            num_comments,
            url: url.into(),
        }
    }
}

/// Fetched public metadata for one candidate community.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Candidate {
    /// Normalised community name (no `r/` prefix).
    pub name: String,
    pub description: String,
    pub subscribers: u64,
    pub active_users: u64,
    /// Rendered as `"short_name: description"`, in source order.
    pub rules: Vec<String>,
    /// Recent items in fetch order; pinned entries are never present.
    pub recent_items: Vec<RecentItem>,
}

impl Candidate {
    /// A candidate with no fetched data.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Description followed by the recent item titles, space-joined.
    pub fn semantic_context(&self) -> String {
        let titles: Vec<&str> = self.recent_items.iter().map(|i| i.title.as_str()).collect();
        format!("{} {}", self.description, titles.join(" "))
    }

    pub fn upvote_counts(&self) -> Vec<u64> {
        self.recent_items.iter().map(|i| i.upvotes).collect()
    }
}
