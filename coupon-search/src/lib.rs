//! # coupon-search
//!
//! Multi-source coupon aggregation for grocery and household items.
//!
//! Given an item name, this crate estimates a baseline market price, queries
//! several deal sources concurrently, and returns a small ranked list of
//! normalised offers.
//!
//! ## Design
//!
//! - Scrapes RetailMeNot and Google Shopping using CSS selectors on HTML
//!   responses; Honey is a simulated partner feed
//! - Settle-all fan-out: a failing, slow or panicking source contributes
//!   nothing and never aborts the search
//! - Deterministic merge order, dedup by `(merchant, code ?? title)`, stable
//!   sort by discount
//! - User-Agent rotation per request
//!
//! ## Security
//!
//! - No API keys or secrets
//! - No network listeners; the HTTP boundary lives in the `coupon-scout` crate
//! - Item names are logged only at debug/trace level

pub mod config;
pub mod error;
pub mod estimator;
pub mod http;
pub mod links;
pub mod orchestrator;
pub mod service;
pub mod source;
pub mod sources;
pub mod types;

pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use estimator::{estimate, BasePrice, Category};
pub use orchestrator::aggregate::Aggregator;
pub use orchestrator::preferences::{Alternative, AlternativeKind, PreferenceMode, Preferences};
pub use service::{BatchSearch, ItemSearch, SearchService};
pub use source::SourceAdapter;
pub use types::{Offer, OfferQuery, OfferType, RawOffer, Source, StoreInfo};

/// Search coupons for one item using every source in `config`.
///
/// Estimates the item's price, aggregates offers from all sources, applies
/// `preferences`, and returns up to `config.max_results` offers sorted by
/// discount.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid, or
/// [`SearchError::Validation`] if `item_name` is blank. Source failures are
/// logged and never returned.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> coupon_search::Result<()> {
/// let config = coupon_search::SearchConfig::default();
/// let prefs = coupon_search::Preferences::default();
/// let found = coupon_search::search("whole wheat bread", &prefs, &config).await?;
/// for offer in &found.coupons {
///     println!("{}% at {}: {}", offer.discount, offer.store, offer.title);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(
    item_name: &str,
    preferences: &Preferences,
    config: &SearchConfig,
) -> Result<ItemSearch> {
    let service = SearchService::new(config.clone())?;
    service.search_item(item_name, preferences).await
}

/// Search coupons with the default configuration and no preferences.
///
/// # Errors
///
/// Same as [`search`].
pub async fn search_default(item_name: &str) -> Result<ItemSearch> {
    search(item_name, &Preferences::default(), &SearchConfig::default()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_validates_config_zero_max_results() {
        let config = SearchConfig {
            max_results: 0,
            ..Default::default()
        };
        let result = search("bread", &Preferences::default(), &config).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("max_results"));
    }

    #[tokio::test]
    async fn search_validates_config_empty_sources() {
        let config = SearchConfig {
            sources: vec![],
            ..Default::default()
        };
        let result = search("bread", &Preferences::default(), &config).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("source"));
    }

    #[tokio::test]
    async fn search_rejects_blank_item() {
        let result = search_default("   ").await;
        assert!(matches!(result, Err(SearchError::Validation(_))));
    }

    #[tokio::test]
    async fn honey_only_search_needs_no_network() {
        let config = SearchConfig {
            sources: vec![Source::Honey],
            ..Default::default()
        };
        let found = search("Bread", &Preferences::default(), &config)
            .await
            .expect("valid search");
        assert_eq!(found.count, 1);
        assert_eq!(found.coupons[0].code.as_deref(), Some("BAKE20"));
        let price = found.coupons[0].discounted_price.expect("price derived");
        assert!(price >= 0.0 && price <= found.estimated_price);
    }
}
