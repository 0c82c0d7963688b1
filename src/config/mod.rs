//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `SCOUT_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_POLICY_MAX_TOKENS, DEFAULT_POLICY_MODEL, DEFAULT_RECENT_ITEM_LIMIT,
    DEFAULT_REQUEST_DELAY, DEFAULT_REQUEST_TIMEOUT, DEFAULT_SOURCE_URL, DEFAULT_USER_AGENT,
    MAX_RECENT_ITEM_LIMIT,
};

/// Ranking configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SCOUT_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the community data source. Default: `https://www.reddit.com`.
    pub source_url: String,

    /// `User-Agent` sent with every data-source request.
    pub user_agent: String,

    /// Per-request transport timeout. Default: 10s.
    pub request_timeout: Duration,

    /// Pause after each successful data-source call. Default: 1.5s.
    pub request_delay: Duration,

    /// Size of the recent-items listing requested per candidate. Default: `5`.
    pub recent_item_limit: u32,

    /// Directory holding the sentence-encoder weights and tokenizer.
    pub embedding_model_dir: Option<PathBuf>,

    /// Completion model used for policy scoring.
    pub policy_model: String,

    /// Completion token budget for policy scoring. Default: `150`.
    pub policy_max_tokens: u32,

    /// Answer policy prompts offline instead of calling a provider.
    pub mock_provider: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            request_delay: DEFAULT_REQUEST_DELAY,
            recent_item_limit: DEFAULT_RECENT_ITEM_LIMIT,
            embedding_model_dir: None,
            policy_model: DEFAULT_POLICY_MODEL.to_string(),
            policy_max_tokens: DEFAULT_POLICY_MAX_TOKENS,
            mock_provider: false,
        }
    }
}

impl Config {
    const ENV_SOURCE_URL: &'static str = "SCOUT_SOURCE_URL";
    const ENV_USER_AGENT: &'static str = "SCOUT_USER_AGENT";
    const ENV_REQUEST_TIMEOUT_SECS: &'static str = "SCOUT_REQUEST_TIMEOUT_SECS";
    const ENV_REQUEST_DELAY_MS: &'static str = "SCOUT_REQUEST_DELAY_MS";
    const ENV_RECENT_ITEM_LIMIT: &'static str = "SCOUT_RECENT_ITEM_LIMIT";
    const ENV_EMBEDDING_MODEL_DIR: &'static str = "SCOUT_EMBEDDING_MODEL_DIR";
    const ENV_POLICY_MODEL: &'static str = "SCOUT_POLICY_MODEL";
    const ENV_POLICY_MAX_TOKENS: &'static str = "SCOUT_POLICY_MAX_TOKENS";
    const ENV_MOCK_PROVIDER: &'static str = "SCOUT_MOCK_PROVIDER";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let source_url = Self::parse_string_from_env(Self::ENV_SOURCE_URL, defaults.source_url);
        let user_agent = Self::parse_string_from_env(Self::ENV_USER_AGENT, defaults.user_agent);
        let request_timeout = Self::parse_u64_from_env(Self::ENV_REQUEST_TIMEOUT_SECS)?
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);
        let request_delay = Self::parse_u64_from_env(Self::ENV_REQUEST_DELAY_MS)?
            .map(Duration::from_millis)
            .unwrap_or(defaults.request_delay);
        let recent_item_limit = Self::parse_u64_from_env(Self::ENV_RECENT_ITEM_LIMIT)?
            .map(|v| Self::bounded_limit(Self::ENV_RECENT_ITEM_LIMIT, v))
            .transpose()?
            .unwrap_or(defaults.recent_item_limit);
        let embedding_model_dir = Self::parse_optional_path_from_env(Self::ENV_EMBEDDING_MODEL_DIR);
        let policy_model = Self::parse_string_from_env(Self::ENV_POLICY_MODEL, defaults.policy_model);
        let policy_max_tokens = Self::parse_u64_from_env(Self::ENV_POLICY_MAX_TOKENS)?
            .map(|v| {
                u32::try_from(v).map_err(|_| ConfigError::OutOfRange {
                    name: Self::ENV_POLICY_MAX_TOKENS,
                    value: v,
                })
            })
            .transpose()?
            .unwrap_or(defaults.policy_max_tokens);
        let mock_provider = env::var_os(Self::ENV_MOCK_PROVIDER).is_some_and(|v| !v.is_empty());

        Ok(Self {
            source_url,
            user_agent,
            request_timeout,
            request_delay,
            recent_item_limit,
            embedding_model_dir,
            policy_model,
            policy_max_tokens,
            mock_provider,
        })
    }

    /// Validates URLs, limits and paths (does not touch the network).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.source_url.trim();
        if url.is_empty() {
            return Err(ConfigError::EmptyValue {
                name: Self::ENV_SOURCE_URL,
            });
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl {
                value: self.source_url.clone(),
            });
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::EmptyValue {
                name: Self::ENV_USER_AGENT,
            });
        }

        if self.policy_model.trim().is_empty() {
            return Err(ConfigError::EmptyValue {
                name: Self::ENV_POLICY_MODEL,
            });
        }

        Self::bounded_limit(Self::ENV_RECENT_ITEM_LIMIT, u64::from(self.recent_item_limit))?;

        if self.request_timeout.is_zero() {
            return Err(ConfigError::OutOfRange {
                name: Self::ENV_REQUEST_TIMEOUT_SECS,
                value: 0,
            });
        }

        if let Some(ref path) = self.embedding_model_dir {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Returns the source URL without a trailing slash.
    pub fn source_base(&self) -> &str {
        self.source_url.trim().trim_end_matches('/')
    }

    fn bounded_limit(name: &'static str, value: u64) -> Result<u32, ConfigError> {
        if value == 0 || value > u64::from(MAX_RECENT_ITEM_LIMIT) {
            return Err(ConfigError::OutOfRange { name, value });
        }
        // In range of u32 after the check above.
        Ok(value as u32)
    }

    fn parse_u64_from_env(var_name: &'static str) -> Result<Option<u64>, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|e| ConfigError::NumberParseError {
                    name: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(None),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }
}
