//! Honey: simulated partner API.
//!
//! Honey exposes deals through an authenticated affiliate API. Until a key
//! is provisioned this source applies deterministic category rules to emit
//! canned offers; swapping in the real API only touches [`HoneySource`].

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::source::SourceAdapter;
use crate::types::{OfferQuery, OfferType, RawOffer, Source, StoreInfo};

/// Item-name keywords that trigger the bakery sale.
const BAKERY_KEYWORDS: &[&str] = &["bread", "bakery"];

/// Simulated Honey deal feed. Makes no network calls.
#[derive(Debug, Default)]
pub struct HoneySource;

#[async_trait]
impl SourceAdapter for HoneySource {
    async fn fetch(
        &self,
        query: &OfferQuery,
        _config: &SearchConfig,
    ) -> Result<Vec<RawOffer>, SearchError> {
        tracing::trace!(item = %query.item_name, "Honey lookup");
        Ok(canned_offers(&query.item_name, Utc::now().date_naive()))
    }

    fn source(&self) -> Source {
        Source::Honey
    }
}

fn canned_offers(item_name: &str, today: NaiveDate) -> Vec<RawOffer> {
    let name = item_name.to_lowercase();
    if !BAKERY_KEYWORDS.iter().any(|k| name.contains(k)) {
        return Vec::new();
    }

    vec![RawOffer {
        source: Source::Honey.name().to_string(),
        kind: OfferType::Website,
        title: format!("{item_name} - Bakery Sale"),
        code: Some("BAKE20".to_string()),
        discount: 20,
        merchant: StoreInfo {
            name: "Target".to_string(),
            website: "https://www.target.com".to_string(),
            is_physical: true,
            sample_address: Some(
                "Multiple locations - Find nearest at target.com/store-locator".to_string(),
            ),
        },
        product_link: format!(
            "https://www.target.com/s?searchTerm={}",
            urlencoding::encode(item_name)
        ),
        valid_until: Source::Honey.valid_until(today),
        discounted_price: None,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).expect("valid date")
    }

    #[test]
    fn bread_triggers_bakery_sale() {
        let offers = canned_offers("Whole Wheat Bread", today());
        assert_eq!(offers.len(), 1);
        let offer = &offers[0];
        assert_eq!(offer.title, "Whole Wheat Bread - Bakery Sale");
        assert_eq!(offer.code.as_deref(), Some("BAKE20"));
        assert_eq!(offer.discount, 20);
        assert_eq!(offer.merchant.name, "Target");
        assert!(offer.merchant.is_physical);
        assert_eq!(
            offer.product_link,
            "https://www.target.com/s?searchTerm=Whole%20Wheat%20Bread"
        );
        assert_eq!(
            offer.valid_until,
            NaiveDate::from_ymd_opt(2026, 10, 24).expect("valid date")
        );
    }

    #[test]
    fn bakery_keyword_is_case_insensitive() {
        assert_eq!(canned_offers("BAKERY rolls", today()).len(), 1);
    }

    #[test]
    fn other_items_get_nothing() {
        assert!(canned_offers("Milk", today()).is_empty());
        assert!(canned_offers("laptop", today()).is_empty());
    }

    #[tokio::test]
    async fn fetch_never_fails() {
        let offers = HoneySource
            .fetch(&OfferQuery::new("bread", 4.0), &SearchConfig::default())
            .await
            .expect("simulated source cannot fail");
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].source, "Honey");
    }
}
