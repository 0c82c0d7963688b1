//! HTTP implementation of [`CandidateSource`] against the public JSON endpoints.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::candidate::RecentItem;
use crate::config::Config;

use super::CandidateSource;
use super::error::FetchError;
use super::pacing::RequestPacer;
use super::parse::{parse_about, parse_recent_items, parse_rules};
use super::types::{AboutRecord, Facet, FetchOutcome};

/// Fetches candidate facets one GET at a time, pausing after each success.
#[derive(Debug)]
pub struct HttpCandidateSource {
    http: reqwest::Client,
    base_url: String,
    recent_item_limit: u32,
    pacer: RequestPacer,
}

impl HttpCandidateSource {
    /// Builds a source with the configured user agent, timeout, and pacing.
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()
            .map_err(FetchError::ClientBuild)?;

        Ok(Self::with_client(
            http,
            config.source_base(),
            config.recent_item_limit,
            config.request_delay,
        ))
    }

    /// Uses a caller-provided client (headers and timeouts are the caller's responsibility).
    pub fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        recent_item_limit: u32,
        request_delay: Duration,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            recent_item_limit,
            pacer: RequestPacer::new(request_delay),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn pacer(&self) -> &RequestPacer {
        &self.pacer
    }

    pub fn about_url(&self, name: &str) -> String {
        format!("{}/r/{}/about.json", self.base_url, name)
    }

    pub fn rules_url(&self, name: &str) -> String {
        format!("{}/r/{}/about/rules.json", self.base_url, name)
    }

    pub fn recent_items_url(&self, name: &str) -> String {
        format!(
            "{}/r/{}/hot.json?limit={}",
            self.base_url, name, self.recent_item_limit
        )
    }

    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Decode {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn fetch_facet<T, F>(&self, name: &str, facet: Facet, url: String, parse: F) -> FetchOutcome<T>
    where
        F: FnOnce(&Value) -> T + Send,
        T: Send,
    {
        match self.get_json(&url).await {
            Ok(body) => {
                debug!(candidate = %name, facet = %facet, "Facet fetched");
                let value = parse(&body);
                self.pacer.pause().await;
                FetchOutcome::Fetched(value)
            }
            Err(err) => {
                warn!(candidate = %name, facet = %facet, error = %err, "Facet fetch failed");
                FetchOutcome::Unavailable(err)
            }
        }
    }
}

#[async_trait]
impl CandidateSource for HttpCandidateSource {
    async fn fetch_about(&self, name: &str) -> FetchOutcome<AboutRecord> {
        self.fetch_facet(name, Facet::About, self.about_url(name), parse_about)
            .await
    }

    async fn fetch_rules(&self, name: &str) -> FetchOutcome<Vec<String>> {
        self.fetch_facet(name, Facet::Rules, self.rules_url(name), parse_rules)
            .await
    }

    async fn fetch_recent_items(&self, name: &str) -> FetchOutcome<Vec<RecentItem>> {
        let link_base = self.base_url.clone();
        self.fetch_facet(name, Facet::RecentItems, self.recent_items_url(name), move |body| {
            parse_recent_items(body, &link_base)
        })
        .await
    }
}
