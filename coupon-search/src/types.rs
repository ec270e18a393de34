//! Core types for offers and source identification.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::estimator::round_to_cents;

/// Supported offer sources that coupon-search can query.
///
/// Declaration order is the registration order: results are merged in this
/// order before deduplication, which makes tie-breaking reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// RetailMeNot: scraped coupon/deal listing.
    #[serde(rename = "retailmenot")]
    RetailMeNot,
    /// Honey: simulated partner API, category-triggered canned offers.
    #[serde(rename = "honey")]
    Honey,
    /// Google Shopping: scraped price comparison listing.
    #[serde(rename = "google-shopping")]
    GoogleShopping,
}

impl Source {
    /// Returns the human-readable name of this source.
    ///
    /// This is also the merchant name used when a listing does not name one.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RetailMeNot => "RetailMeNot",
            Self::Honey => "Honey",
            Self::GoogleShopping => "Google Shopping",
        }
    }

    /// Returns the site root that relative links from this source resolve against.
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::RetailMeNot => "https://www.retailmenot.com",
            Self::Honey => "https://www.joinhoney.com",
            Self::GoogleShopping => "https://www.google.com",
        }
    }

    /// Days an offer from this source is assumed valid, counted from fetch time.
    ///
    /// Source pages rarely expose a real expiry date.
    pub fn validity_days(&self) -> u64 {
        match self {
            Self::RetailMeNot => 30,
            Self::Honey => 7,
            Self::GoogleShopping => 14,
        }
    }

    /// Expiry date for an offer fetched on `fetched_on`.
    pub fn valid_until(&self, fetched_on: NaiveDate) -> NaiveDate {
        fetched_on
            .checked_add_days(Days::new(self.validity_days()))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Returns all available sources in registration order.
    pub fn all() -> &'static [Source] {
        &[Self::RetailMeNot, Self::Honey, Self::GoogleShopping]
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How an offer is redeemed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OfferType {
    /// Online offer, usually with a code to enter at checkout.
    Website,
    /// Code-less sale advertised by the merchant.
    StoreBanner,
}

/// Merchant details attached to every offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreInfo {
    /// Merchant display name.
    pub name: String,
    /// Absolute URL of the merchant (or the listing that named it).
    pub website: String,
    /// Whether the merchant has a brick-and-mortar presence.
    pub is_physical: bool,
    /// Generic locator text, never a precise address.
    pub sample_address: Option<String>,
}

/// A single offer as produced by a source adapter, before aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawOffer {
    /// Which source produced this offer (its [`Source::name`]).
    pub source: String,
    pub kind: OfferType,
    pub title: String,
    /// Redeemable coupon code, `None` when the listing has none.
    pub code: Option<String>,
    /// Discount percentage in `[0, 100]`.
    pub discount: u8,
    pub merchant: StoreInfo,
    /// Absolute product or deal URL.
    pub product_link: String,
    pub valid_until: NaiveDate,
    /// Price after discount, when the source knows the listed price.
    pub discounted_price: Option<f64>,
}

/// An aggregated offer, the unit returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[serde(rename = "type")]
    pub kind: OfferType,
    pub title: String,
    pub code: Option<String>,
    pub discount: u8,
    /// Merchant name, duplicated from `store_info.name` for flat access.
    pub store: String,
    pub store_info: StoreInfo,
    pub product_link: String,
    /// Serialised as `YYYY-MM-DD`.
    pub valid_until: NaiveDate,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<f64>,
}

impl Offer {
    /// Build an offer from adapter output, deriving the discounted price
    /// from `base_price` when the source did not supply one.
    pub fn from_raw(raw: RawOffer, base_price: f64) -> Self {
        let discounted_price = raw.discounted_price.or_else(|| {
            Some(round_to_cents(
                base_price * (1.0 - f64::from(raw.discount) / 100.0),
            ))
        });
        Self {
            kind: raw.kind,
            title: raw.title,
            code: raw.code,
            discount: raw.discount,
            store: raw.merchant.name.clone(),
            store_info: raw.merchant,
            product_link: raw.product_link,
            valid_until: raw.valid_until,
            source: raw.source,
            discounted_price,
        }
    }

    /// Returns `true` if the offer is not tied to a specific merchant, i.e.
    /// the listing fell back to naming the aggregator itself.
    pub fn is_general(&self) -> bool {
        self.store == self.source
    }
}

/// What a single search asks every source for.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferQuery {
    /// Trimmed, non-empty item name.
    pub item_name: String,
    /// Estimated market price used for price comparison and discounted prices.
    pub base_price: f64,
}

impl OfferQuery {
    pub fn new(item_name: impl Into<String>, base_price: f64) -> Self {
        Self {
            item_name: item_name.into(),
            base_price,
        }
    }
}
