//! Offer deduplication by merchant and code.
//!
//! Two offers are the same logical deal when they share a merchant and
//! either the same code or, when there is no code, the same title. The first
//! occurrence wins and the relative order of survivors is preserved, so the
//! source registration order decides which copy is kept.
//!
//! Two distinct code-less banners from one merchant that share a generic
//! title collapse into one; that is accepted.

use std::collections::HashSet;

use crate::types::RawOffer;

/// Identity of an offer for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    store: String,
    code_or_title: String,
}

impl DedupKey {
    /// Build the key for an offer: `(merchant, code ?? title)`.
    pub fn of(offer: &RawOffer) -> Self {
        Self {
            store: offer.merchant.name.clone(),
            code_or_title: offer.code.clone().unwrap_or_else(|| offer.title.clone()),
        }
    }
}

/// Deduplicate offers, keeping the first occurrence of each [`DedupKey`].
///
/// Idempotent: deduplicating an already deduplicated list is a no-op.
pub fn deduplicate(offers: Vec<RawOffer>) -> Vec<RawOffer> {
    let mut seen = HashSet::new();
    let before = offers.len();

    let unique: Vec<RawOffer> = offers
        .into_iter()
        .filter(|offer| seen.insert(DedupKey::of(offer)))
        .collect();

    if unique.len() < before {
        tracing::debug!(dropped = before - unique.len(), "duplicate offers removed");
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OfferType, StoreInfo};
    use chrono::NaiveDate;

    fn offer(store: &str, code: Option<&str>, title: &str, source: &str) -> RawOffer {
        RawOffer {
            source: source.to_string(),
            kind: OfferType::Website,
            title: title.to_string(),
            code: code.map(str::to_string),
            discount: 10,
            merchant: StoreInfo {
                name: store.to_string(),
                website: "https://example.com".into(),
                is_physical: false,
                sample_address: None,
            },
            product_link: "https://example.com/deal".into(),
            valid_until: NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date"),
            discounted_price: None,
        }
    }

    #[test]
    fn same_store_and_code_merged_first_wins() {
        let offers = vec![
            offer("Target", Some("SAVE10"), "Save 10", "RetailMeNot"),
            offer("Target", Some("SAVE10"), "Different title", "Honey"),
        ];
        let unique = deduplicate(offers);
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].source, "RetailMeNot");
    }

    #[test]
    fn same_code_different_store_kept() {
        let offers = vec![
            offer("Target", Some("SAVE10"), "Save 10", "RetailMeNot"),
            offer("Walmart", Some("SAVE10"), "Save 10", "RetailMeNot"),
        ];
        assert_eq!(deduplicate(offers).len(), 2);
    }

    #[test]
    fn codeless_offers_keyed_by_title() {
        let offers = vec![
            offer("Kroger", None, "Dairy Products Sale", "RetailMeNot"),
            offer("Kroger", None, "Dairy Products Sale", "Google Shopping"),
            offer("Kroger", None, "Bakery Sale", "RetailMeNot"),
        ];
        let unique = deduplicate(offers);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[1].title, "Bakery Sale");
    }

    #[test]
    fn code_equal_to_other_title_shares_key() {
        // The key compares `code ?? title` by value, so these collide.
        let offers = vec![
            offer("Kroger", Some("SALE"), "Weekly", "RetailMeNot"),
            offer("Kroger", None, "SALE", "RetailMeNot"),
        ];
        assert_eq!(deduplicate(offers).len(), 1);
    }

    #[test]
    fn order_preserved_among_survivors() {
        let offers = vec![
            offer("A", Some("1"), "a", "s"),
            offer("B", Some("2"), "b", "s"),
            offer("A", Some("1"), "a again", "s"),
            offer("C", Some("3"), "c", "s"),
        ];
        let stores: Vec<String> = deduplicate(offers)
            .into_iter()
            .map(|o| o.merchant.name)
            .collect();
        assert_eq!(stores, vec!["A", "B", "C"]);
    }

    #[test]
    fn deduplicate_is_idempotent() {
        let offers = vec![
            offer("A", Some("1"), "a", "s"),
            offer("A", None, "a", "s"),
            offer("A", Some("1"), "dup", "s"),
            offer("B", None, "b", "s"),
            offer("B", None, "b", "t"),
        ];
        let once = deduplicate(offers);
        let twice = deduplicate(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_input_returns_empty() {
        assert!(deduplicate(vec![]).is_empty());
    }
}
