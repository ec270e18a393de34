//! Caller preferences applied to aggregated offers.

use serde::{Deserialize, Serialize};

use crate::estimator::{round_to_cents, BasePrice, Category};
use crate::types::Offer;

/// Which kind of alternative the caller wants when no real offers exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferenceMode {
    /// Prefer the lowest price: suggest a generic brand.
    Cheapest,
    /// Prefer advertised sales: suggest a brand sale.
    Sales,
}

/// Kind of alternative suggested for an item without coupons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlternativeKind {
    Cheapest,
    Sale,
}

/// Price hint shown in place of coupons when a search finds none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alternative {
    #[serde(rename = "type")]
    pub kind: AlternativeKind,
    /// Estimated price after `discount`, rounded to cents.
    pub price: f64,
    pub discount: u8,
    pub source: String,
    pub category: Category,
}

impl Alternative {
    fn new(kind: AlternativeKind, base: &BasePrice) -> Self {
        let (discount, source) = match kind {
            AlternativeKind::Cheapest => (15, "Generic Brand (Cheapest)"),
            AlternativeKind::Sale => (8, "Brand Sale"),
        };
        Self {
            kind,
            price: round_to_cents(base.amount * (1.0 - f64::from(discount) / 100.0)),
            discount,
            source: source.to_string(),
            category: base.category,
        }
    }
}

/// Optional search preferences, deserialised from the request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub preference: Option<PreferenceMode>,
    /// Merchant names to restrict results to (case-insensitive substring).
    pub store_specific: Vec<String>,
    /// Whether to include offers not tied to a specific merchant.
    /// `None` means include.
    pub general: Option<bool>,
}

impl Preferences {
    /// Alternative to suggest when a search finds nothing.
    ///
    /// `cheapest` suggests a generic brand at 15% below the estimate; any
    /// other choice, including none, suggests a brand sale at 8% below.
    pub fn alternative(&self, base: &BasePrice) -> Alternative {
        let kind = match self.preference {
            Some(PreferenceMode::Cheapest) => AlternativeKind::Cheapest,
            Some(PreferenceMode::Sales) | None => AlternativeKind::Sale,
        };
        Alternative::new(kind, base)
    }

    /// Filter offers by these preferences, preserving order.
    ///
    /// - `general == Some(false)` drops offers that only name the aggregator.
    /// - A non-empty `store_specific` keeps offers whose store matches one of
    ///   the names; if none match, every offer is kept rather than returning
    ///   nothing.
    pub fn apply(&self, offers: Vec<Offer>) -> Vec<Offer> {
        let offers: Vec<Offer> = if self.general == Some(false) {
            offers.into_iter().filter(|o| !o.is_general()).collect()
        } else {
            offers
        };

        let wanted: Vec<String> = self
            .store_specific
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        if wanted.is_empty() {
            return offers;
        }

        let matches_store = |offer: &Offer| {
            let store = offer.store.to_lowercase();
            wanted.iter().any(|w| store.contains(w.as_str()))
        };
        if offers.iter().any(matches_store) {
            offers.into_iter().filter(|o| matches_store(o)).collect()
        } else {
            tracing::debug!("no offers from preferred stores; keeping all");
            offers
        }
    }
}
