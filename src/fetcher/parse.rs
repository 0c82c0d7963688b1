//! Defensive extraction of candidate fields from data-source JSON.
//!
//! Response shapes belong to the external service. Missing or renamed fields fall back
//! to defaults instead of failing the facet.

use serde_json::Value;

use crate::candidate::RecentItem;

use super::types::AboutRecord;

/// Renders `rules[]` as `"short_name: description"`.
pub fn parse_rules(body: &Value) -> Vec<String> {
    body.get("rules")
        .and_then(Value::as_array)
        .map(|rules| {
            rules
                .iter()
                .map(|rule| format!("{}: {}", str_field(rule, "short_name"), str_field(rule, "description")))
                .collect()
        })
        .unwrap_or_default()
}

pub fn parse_about(body: &Value) -> AboutRecord {
    let Some(data) = body.get("data") else {
        return AboutRecord::default();
    };

    let description = data
        .get("public_description")
        .filter(|v| !v.is_null())
        .or_else(|| data.get("description"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    AboutRecord {
        description,
        subscribers: count(data.get("subscribers")),
        active_users: count(
            data.get("accounts_active")
                .filter(|v| !v.is_null())
                .or_else(|| data.get("active_user_count")),
        ),
    }
}

/// Reads `data.children[].data`, dropping pinned entries.
pub fn parse_recent_items(body: &Value, link_base: &str) -> Vec<RecentItem> {
    let Some(children) = body
        .get("data")
        .and_then(|d| d.get("children"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    children
        .iter()
        .filter_map(|child| child.get("data"))
        .filter(|item| !is_pinned(item))
        .map(|item| RecentItem {
            title: str_field(item, "title").to_string(),
            upvotes: count(item.get("score")),
            num_comments: count(item.get("num_comments")),
            url: format!("{}{}", link_base, str_field(item, "permalink")),
        })
        .collect()
}

fn is_pinned(item: &Value) -> bool {
    ["stickied", "pinned"]
        .iter()
        .any(|key| item.get(*key).and_then(Value::as_bool).unwrap_or(false))
}

fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Non-negative integer count; negatives clamp to 0 and fractions truncate.
fn count(value: Option<&Value>) -> u64 {
    let Some(value) = value else {
        return 0;
    };

    if let Some(n) = value.as_u64() {
        return n;
    }
    if value.as_i64().is_some() {
        return 0;
    }
    match value.as_f64() {
        Some(f) if f.is_finite() && f > 0.0 => f.trunc() as u64,
        _ => 0,
    }
}
