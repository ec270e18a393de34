//! Core aggregator: concurrent multi-source fan-out, dedup, rank.
//!
//! Queries every registered source concurrently and waits for all of them
//! to settle. A source that errors, times out, or panics contributes
//! nothing; it never aborts the search.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::links::is_absolute_http;
use crate::source::SourceAdapter;
use crate::sources::adapter_for;
use crate::types::{Offer, OfferQuery, RawOffer};

use super::dedup::deduplicate;
use super::preferences::Preferences;
use super::ranking::rank;

/// Aggregates offers from a fixed, ordered set of sources.
///
/// Holds no mutable state; concurrent searches share nothing but the
/// adapters themselves.
pub struct Aggregator {
    config: SearchConfig,
    adapters: Vec<Arc<dyn SourceAdapter>>,
}

impl Aggregator {
    /// Build an aggregator over the production adapters for `config.sources`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid.
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        let adapters = config.sources.iter().map(|s| adapter_for(*s)).collect();
        Self::with_adapters(config, adapters)
    }

    /// Build an aggregator over explicit adapters, queried and merged in the
    /// given order. `config.sources` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid or `adapters`
    /// is empty.
    pub fn with_adapters(
        config: SearchConfig,
        adapters: Vec<Arc<dyn SourceAdapter>>,
    ) -> Result<Self, SearchError> {
        config.validate()?;
        if adapters.is_empty() {
            return Err(SearchError::Config(
                "at least one source must be enabled".into(),
            ));
        }
        Ok(Self { config, adapters })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Names of the registered sources, in merge order.
    pub fn source_names(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    /// Search every source for `query` and return ranked offers.
    ///
    /// # Pipeline
    ///
    /// 1. Fan out to all adapters with [`futures::future::join_all`]; each
    ///    is bounded by the configured timeout
    /// 2. Concatenate results in registration order, failures contribute nothing
    /// 3. Drop offers whose links are not absolute `http(s)` URLs
    /// 4. Deduplicate by `(merchant, code ?? title)`
    /// 5. Derive discounted prices from `query.base_price`
    /// 6. Apply `preferences`
    /// 7. Stable sort by discount (descending), truncate to `max_results`
    ///
    /// Never fails: if every source fails the result is empty.
    pub async fn search(&self, query: &OfferQuery, preferences: &Preferences) -> Vec<Offer> {
        let outcomes = futures::future::join_all(
            self.adapters
                .iter()
                .map(|adapter| settle(adapter.as_ref(), query, &self.config)),
        )
        .await;

        let candidates: Vec<RawOffer> = outcomes
            .into_iter()
            .flatten()
            .filter(|offer| {
                let ok = is_absolute_http(&offer.product_link)
                    && is_absolute_http(&offer.merchant.website);
                if !ok {
                    tracing::warn!(
                        source = %offer.source,
                        link = %offer.product_link,
                        "dropping offer with non-absolute link"
                    );
                }
                ok
            })
            .collect();

        let offers: Vec<Offer> = deduplicate(candidates)
            .into_iter()
            .map(|raw| Offer::from_raw(raw, query.base_price))
            .collect();

        let mut offers = preferences.apply(offers);
        rank(&mut offers, self.config.max_results);

        tracing::debug!(count = offers.len(), "aggregation complete");
        offers
    }
}

/// Run one adapter to completion, mapping every failure to an empty result.
///
/// Failures are logged at warn level with the source name so that a broken
/// source is distinguishable from one that simply has no deals.
async fn settle(
    adapter: &dyn SourceAdapter,
    query: &OfferQuery,
    config: &SearchConfig,
) -> Vec<RawOffer> {
    let source = adapter.name();
    let fetch = AssertUnwindSafe(adapter.fetch(query, config)).catch_unwind();

    match tokio::time::timeout(config.timeout(), fetch).await {
        Ok(Ok(Ok(offers))) => {
            tracing::debug!(source, count = offers.len(), "source returned offers");
            offers
        }
        Ok(Ok(Err(err))) => {
            tracing::warn!(source, error = %err, "source query failed");
            Vec::new()
        }
        Ok(Err(_)) => {
            tracing::warn!(source, "source panicked");
            Vec::new()
        }
        Err(_) => {
            tracing::warn!(
                source,
                timeout_seconds = config.timeout_seconds,
                "source timed out"
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OfferType, Source, StoreInfo};
    use async_trait::async_trait;
    use chrono::NaiveDate;

    enum Behaviour {
        Offers(Vec<RawOffer>),
        Fail,
        Panic,
        Hang,
    }

    struct ScriptedSource {
        source: Source,
        behaviour: Behaviour,
    }

    #[async_trait]
    impl SourceAdapter for ScriptedSource {
        async fn fetch(
            &self,
            _query: &OfferQuery,
            _config: &SearchConfig,
        ) -> Result<Vec<RawOffer>, SearchError> {
            match &self.behaviour {
                Behaviour::Offers(offers) => Ok(offers.clone()),
                Behaviour::Fail => Err(SearchError::Http("connection refused".into())),
                Behaviour::Panic => panic!("scripted panic"),
                Behaviour::Hang => {
                    tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
                    Ok(Vec::new())
                }
            }
        }

        fn source(&self) -> Source {
            self.source
        }
    }

    fn scripted(source: Source, behaviour: Behaviour) -> Arc<dyn SourceAdapter> {
        Arc::new(ScriptedSource { source, behaviour })
    }

    fn raw(store: &str, title: &str, discount: u8) -> RawOffer {
        RawOffer {
            source: "RetailMeNot".into(),
            kind: OfferType::StoreBanner,
            title: title.to_string(),
            code: None,
            discount,
            merchant: StoreInfo {
                name: store.to_string(),
                website: "https://www.retailmenot.com".into(),
                is_physical: false,
                sample_address: None,
            },
            product_link: "https://www.retailmenot.com/view/x".into(),
            valid_until: NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date"),
            discounted_price: None,
        }
    }

    fn aggregator(adapters: Vec<Arc<dyn SourceAdapter>>) -> Aggregator {
        Aggregator::with_adapters(SearchConfig::default(), adapters).expect("valid config")
    }

    fn query() -> OfferQuery {
        OfferQuery::new("bread", 5.0)
    }

    #[tokio::test]
    async fn failing_sources_do_not_abort() {
        let agg = aggregator(vec![
            scripted(Source::RetailMeNot, Behaviour::Fail),
            scripted(Source::Honey, Behaviour::Offers(vec![raw("Target", "a", 20)])),
            scripted(Source::GoogleShopping, Behaviour::Panic),
        ]);
        let offers = agg.search(&query(), &Preferences::default()).await;
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].store, "Target");
    }

    #[tokio::test]
    async fn all_sources_failing_yields_empty() {
        let agg = aggregator(vec![
            scripted(Source::RetailMeNot, Behaviour::Fail),
            scripted(Source::Honey, Behaviour::Panic),
        ]);
        assert!(agg.search(&query(), &Preferences::default()).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn hung_source_times_out_without_blocking_others() {
        let agg = aggregator(vec![
            scripted(Source::RetailMeNot, Behaviour::Hang),
            scripted(Source::Honey, Behaviour::Offers(vec![raw("Target", "a", 20)])),
        ]);
        let offers = agg.search(&query(), &Preferences::default()).await;
        assert_eq!(offers.len(), 1);
    }

    #[tokio::test]
    async fn merged_in_registration_order_for_ties() {
        let agg = aggregator(vec![
            scripted(
                Source::RetailMeNot,
                Behaviour::Offers(vec![raw("A", "first", 20)]),
            ),
            scripted(Source::Honey, Behaviour::Offers(vec![raw("B", "second", 20)])),
        ]);
        let offers = agg.search(&query(), &Preferences::default()).await;
        let titles: Vec<&str> = offers.iter().map(|o| o.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn output_bounded_sorted_and_priced() {
        let many: Vec<RawOffer> = (0..9u8)
            .map(|i| raw(&format!("Store {i}"), "deal", i * 5))
            .collect();
        let agg = aggregator(vec![scripted(Source::RetailMeNot, Behaviour::Offers(many))]);
        let offers = agg.search(&query(), &Preferences::default()).await;

        assert_eq!(offers.len(), 5);
        for pair in offers.windows(2) {
            assert!(pair[0].discount >= pair[1].discount);
        }
        for offer in &offers {
            let price = offer.discounted_price.expect("price derived");
            assert!((0.0..=5.0).contains(&price));
        }
        assert_eq!(offers[0].discounted_price, Some(3.0));
    }

    #[tokio::test]
    async fn duplicates_across_sources_removed() {
        let agg = aggregator(vec![
            scripted(
                Source::RetailMeNot,
                Behaviour::Offers(vec![raw("Kroger", "Dairy Sale", 10)]),
            ),
            scripted(
                Source::Honey,
                Behaviour::Offers(vec![raw("Kroger", "Dairy Sale", 40)]),
            ),
        ]);
        let offers = agg.search(&query(), &Preferences::default()).await;
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].discount, 10);
    }

    #[tokio::test]
    async fn relative_links_dropped() {
        let mut bad = raw("Target", "bad link", 50);
        bad.product_link = "/view/target.com".into();
        let agg = aggregator(vec![scripted(
            Source::RetailMeNot,
            Behaviour::Offers(vec![bad, raw("Walmart", "good", 10)]),
        )]);
        let offers = agg.search(&query(), &Preferences::default()).await;
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].store, "Walmart");
    }

    #[test]
    fn empty_adapters_rejected() {
        let result = Aggregator::with_adapters(SearchConfig::default(), vec![]);
        assert!(matches!(result, Err(SearchError::Config(_))));
    }

    #[test]
    fn invalid_config_rejected() {
        let config = SearchConfig {
            max_results: 0,
            ..Default::default()
        };
        assert!(Aggregator::new(config).is_err());
    }

    #[test]
    fn default_sources_registered_in_order() {
        let agg = Aggregator::new(SearchConfig::default()).expect("valid config");
        assert_eq!(
            agg.source_names(),
            vec!["RetailMeNot", "Honey", "Google Shopping"]
        );
    }
}
