//! Error types for the coupon-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. Only [`SearchError::Validation`] ever reaches
//! a caller of the search service; source-level errors are recovered inside
//! the aggregation pipeline.

/// Errors that can occur while searching for offers.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Malformed or missing request input (blank item name, empty batch).
    #[error("validation error: {0}")]
    Validation(String),

    /// A source did not respond within its timeout.
    #[error("source timed out: {0}")]
    Timeout(String),

    /// An HTTP request to a source failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Failed to parse a source's response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Returns `true` if this error was caused by bad caller input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Convenience type alias for coupon-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
