//! Request-level search service: validation, price estimation, aggregation
//! and response envelopes for single-item and batch searches.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::{FutureExt, StreamExt};
use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::estimator::{estimate_base_price, BasePrice};
use crate::orchestrator::aggregate::Aggregator;
use crate::orchestrator::preferences::{Alternative, Preferences};
use crate::types::{Offer, OfferQuery};

/// Price estimator used by [`SearchService`]. Swappable for deterministic tests.
pub type PriceEstimator = Arc<dyn Fn(&str) -> BasePrice + Send + Sync>;

/// Result of searching a single item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSearch {
    /// Trimmed item name.
    pub item_name: String,
    pub estimated_price: f64,
    pub coupons: Vec<Offer>,
    pub count: usize,
    /// Price hint chosen by the caller's preference; set whenever a
    /// successful search found no coupons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative: Option<Alternative>,
    /// Why this item failed inside a batch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ItemSearch {
    fn found(
        item_name: &str,
        price: &BasePrice,
        coupons: Vec<Offer>,
        prefs: &Preferences,
    ) -> Self {
        let alternative = coupons.is_empty().then(|| prefs.alternative(price));
        Self {
            item_name: item_name.to_string(),
            estimated_price: price.amount,
            count: coupons.len(),
            coupons,
            alternative,
            error: None,
        }
    }

    fn failed(item_name: &str, estimated_price: f64, error: String) -> Self {
        Self {
            item_name: item_name.to_string(),
            estimated_price,
            coupons: Vec::new(),
            count: 0,
            alternative: None,
            error: Some(error),
        }
    }
}

/// Result of a batch search, entries in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSearch {
    pub results: Vec<ItemSearch>,
    /// Sum of every entry's `count`.
    pub total_count: usize,
}

/// Boundary between callers (HTTP handlers, CLIs) and the aggregator.
///
/// Only input validation is reported as an error. Everything below this
/// layer is recovered: a search on a valid item always yields an envelope,
/// possibly with no coupons.
pub struct SearchService {
    aggregator: Aggregator,
    estimator: PriceEstimator,
}

impl SearchService {
    /// Create a service over the production sources in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid.
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        Ok(Self::with_aggregator(Aggregator::new(config)?))
    }

    pub fn with_aggregator(aggregator: Aggregator) -> Self {
        Self {
            aggregator,
            estimator: Arc::new(estimate_base_price),
        }
    }

    /// Replace the random price estimator.
    pub fn with_price_estimator(
        mut self,
        estimator: impl Fn(&str) -> BasePrice + Send + Sync + 'static,
    ) -> Self {
        self.estimator = Arc::new(estimator);
        self
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Search coupons for one item.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Validation`] if `item_name` is blank. No source
    /// is contacted in that case.
    pub async fn search_item(
        &self,
        item_name: &str,
        prefs: &Preferences,
    ) -> Result<ItemSearch, SearchError> {
        let name = item_name.trim();
        if name.is_empty() {
            return Err(SearchError::Validation(
                "Please provide an item name to search for coupons".into(),
            ));
        }

        let price = (self.estimator)(name);
        tracing::debug!(
            item = name,
            category = %price.category,
            estimated_price = price.amount,
            "searching coupons"
        );

        let query = OfferQuery::new(name, price.amount);
        let coupons = match AssertUnwindSafe(self.aggregator.search(&query, prefs))
            .catch_unwind()
            .await
        {
            Ok(coupons) => coupons,
            Err(_) => {
                tracing::error!("aggregation panicked");
                Vec::new()
            }
        };

        tracing::info!(count = coupons.len(), "coupon search complete");
        Ok(ItemSearch::found(name, &price, coupons, prefs))
    }

    /// Search coupons for several items concurrently.
    ///
    /// A failing item is reported in its own entry and never affects its
    /// siblings.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Validation`] if `items` is empty.
    pub async fn search_batch(
        &self,
        items: &[String],
        prefs: &Preferences,
    ) -> Result<BatchSearch, SearchError> {
        if items.is_empty() {
            return Err(SearchError::Validation(
                "Please provide an array of item names".into(),
            ));
        }

        tracing::info!(items = items.len(), "batch coupon search");

        let searches: Vec<_> = items
            .iter()
            .map(|item| self.search_entry(item, prefs))
            .collect();
        let results: Vec<ItemSearch> = match self.aggregator.config().batch_concurrency {
            Some(limit) => {
                futures::stream::iter(searches)
                    .buffered(limit)
                    .collect::<Vec<_>>()
                    .await
            }
            None => futures::future::join_all(searches).await,
        };

        let total_count = results.iter().map(|r| r.count).sum();
        Ok(BatchSearch {
            results,
            total_count,
        })
    }

    async fn search_entry(&self, item: &str, prefs: &Preferences) -> ItemSearch {
        match self.search_item(item, prefs).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(error = %err, "batch item failed");
                let name = item.trim();
                ItemSearch::failed(name, (self.estimator)(name).amount, err.to_string())
            }
        }
    }
}
