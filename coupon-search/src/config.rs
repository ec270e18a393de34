//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls which sources are queried, per-source timeouts,
//! result bounds and request behaviour. It deserialises with defaults for
//! any missing field, so it can be embedded in a larger TOML config.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::SearchError;
use crate::types::Source;

/// Configuration for coupon searches.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Which sources to query, in registration (merge) order.
    pub sources: Vec<Source>,
    /// Maximum number of offers returned per item after dedup and ranking.
    pub max_results: usize,
    /// Per-source request timeout in seconds.
    pub timeout_seconds: u64,
    /// Custom User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents.
    pub user_agent: Option<String>,
    /// Upper bound on items searched at once in a batch. `None` searches
    /// every item concurrently.
    pub batch_concurrency: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            sources: Source::all().to_vec(),
            max_results: 5,
            timeout_seconds: 10,
            user_agent: None,
            batch_concurrency: None,
        }
    }
}

impl SearchConfig {
    /// Per-source timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `max_results` must be greater than 0
    /// - `timeout_seconds` must be greater than 0
    /// - `sources` must not be empty
    /// - `batch_concurrency`, when set, must be greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_results == 0 {
            return Err(SearchError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.sources.is_empty() {
            return Err(SearchError::Config(
                "at least one source must be enabled".into(),
            ));
        }
        if self.batch_concurrency == Some(0) {
            return Err(SearchError::Config(
                "batch_concurrency must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
