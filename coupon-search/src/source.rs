//! Trait definition for pluggable offer sources.
//!
//! Each source (RetailMeNot, Honey, Google Shopping) implements
//! [`SourceAdapter`] to provide a uniform interface for querying a third
//! party and normalising its results into [`RawOffer`] values.

use async_trait::async_trait;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::{OfferQuery, RawOffer, Source};

/// A pluggable offer source.
///
/// Implementors fetch a specific source's data and extract structured
/// [`RawOffer`] values. Each source handles its own:
///
/// - query construction with encoding
/// - HTTP request with appropriate headers and the configured timeout
/// - parsing (CSS selectors for HTML sources)
/// - resolving relative links against its own site root
///
/// Implementations report failures as [`SearchError`]; the aggregator
/// converts every error into an empty contribution and logs it, so a broken
/// source never aborts a search.
///
/// All implementations must be `Send + Sync` for concurrent source queries.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Fetch offers for `query` and return them in source order.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the HTTP request fails, times out, or the
    /// response cannot be parsed.
    async fn fetch(
        &self,
        query: &OfferQuery,
        config: &SearchConfig,
    ) -> Result<Vec<RawOffer>, SearchError>;

    /// Returns which [`Source`] this implementation represents.
    fn source(&self) -> Source;

    /// Name used in logs and on emitted offers.
    fn name(&self) -> &'static str {
        self.source().name()
    }
}
