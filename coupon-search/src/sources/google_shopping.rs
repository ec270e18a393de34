//! Google Shopping: scraped price comparison listing.
//!
//! Shopping results carry a listed price rather than a coupon. A listing
//! becomes an offer only when it undercuts the estimated base price, and the
//! discount is the relative saving (capped, since malformed pages produce
//! absurd prices).

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use regex::Regex;
use scraper::Html;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::links::resolve_link;
use crate::source::SourceAdapter;
use crate::types::{OfferQuery, OfferType, RawOffer, Source, StoreInfo};

use super::{first_text, selector};

/// Offers emitted per search page.
const MAX_OFFERS: usize = 2;

/// Upper bound on a comparison-derived discount.
const MAX_COMPARISON_DISCOUNT: u8 = 50;

/// Google Shopping HTML scraper.
///
/// Google employs aggressive bot detection, so this source fails more often
/// than the others; the aggregator tolerates that.
pub struct GoogleShoppingSource {
    base_url: String,
}

impl GoogleShoppingSource {
    pub fn new() -> Self {
        Self::with_base_url(Source::GoogleShopping.base_url())
    }

    /// Point the scraper at a different site root (mirrors, test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for GoogleShoppingSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for GoogleShoppingSource {
    async fn fetch(
        &self,
        query: &OfferQuery,
        config: &SearchConfig,
    ) -> Result<Vec<RawOffer>, SearchError> {
        tracing::trace!(item = %query.item_name, "Google Shopping search");

        let client = http::build_client(config)?;
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let q = format!("{} coupon discount", query.item_name);

        let html = http::get_html(
            &client,
            self.name(),
            &url,
            &[("q", q.as_str()), ("tbm", "shop")],
        )
        .await?;

        tracing::trace!(bytes = html.len(), "Google Shopping response received");

        parse_shopping_html(
            &html,
            &self.base_url,
            query.base_price,
            Utc::now().date_naive(),
        )
    }

    fn source(&self) -> Source {
        Source::GoogleShopping
    }
}

/// Parse a Google Shopping results page into price-comparison offers.
fn parse_shopping_html(
    html: &str,
    base_url: &str,
    base_price: f64,
    today: NaiveDate,
) -> Result<Vec<RawOffer>, SearchError> {
    let document = Html::parse_document(html);

    let result_sel = selector(".sh-dgr__content, .sh-dgr__google-result")?;
    let title_sel = selector("h3, .sh-dgr__title")?;
    let price_sel = selector(".price, .sh-dgr__price")?;
    let merchant_sel = selector(".merchant, .sh-dgr__merchant")?;
    let link_sel = selector("a[href]")?;
    let price_re = Regex::new(PRICE_PATTERN)
        .map_err(|e| SearchError::Parse(format!("invalid price pattern: {e}")))?;

    let mut offers = Vec::new();

    for element in document.select(&result_sel) {
        let title = first_text(&element, &title_sel);
        let price_text = first_text(&element, &price_sel);
        if title.is_empty() || price_text.is_empty() {
            continue;
        }

        let Some(listed) = parse_price(&price_text, &price_re) else {
            continue;
        };
        if listed <= 0.0 || listed >= base_price {
            continue;
        }

        let href = element
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .unwrap_or_default();
        let Some(link) = resolve_link(base_url, href) else {
            tracing::debug!(href, "Google Shopping result link not resolvable");
            continue;
        };

        let store = Some(first_text(&element, &merchant_sel))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Source::GoogleShopping.name().to_string());

        offers.push(RawOffer {
            source: Source::GoogleShopping.name().to_string(),
            kind: OfferType::Website,
            title,
            code: None,
            discount: comparison_discount(base_price, listed),
            merchant: StoreInfo {
                name: store,
                website: link.clone(),
                is_physical: false,
                sample_address: None,
            },
            product_link: link,
            valid_until: Source::GoogleShopping.valid_until(today),
            discounted_price: Some(listed),
        });

        if offers.len() >= MAX_OFFERS {
            break;
        }
    }

    tracing::debug!(count = offers.len(), "Google Shopping offers parsed");
    Ok(offers)
}

/// A price with optional thousands separators, or a bare fraction like `.99`.
const PRICE_PATTERN: &str = r"\d[\d,]*(?:\.\d+)?|\.\d+";

/// Read the first number out of a price label such as `"$1,299.99 used"`.
fn parse_price(text: &str, price_re: &Regex) -> Option<f64> {
    let digits = price_re.find(text)?.as_str().replace(',', "");
    digits.parse::<f64>().ok()
}

/// Relative saving of `listed` against `base_price`, in whole percent.
fn comparison_discount(base_price: f64, listed: f64) -> u8 {
    let pct = ((base_price - listed) / base_price * 100.0).round();
    pct.clamp(0.0, f64::from(MAX_COMPARISON_DISCOUNT)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.google.com";

    const MOCK_HTML: &str = r#"<!DOCTYPE html>
<html>
<body>
<div class="sh-dgr__content">
  <h3>Artisan Sourdough Loaf</h3>
  <span class="price">$3.00</span>
  <span class="merchant">Safeway</span>
  <a href="/shopping/product/123">View</a>
</div>
<div class="sh-dgr__content">
  <h3>Premium Bread Overpriced</h3>
  <span class="price">$9.99</span>
  <span class="merchant">Fancy Grocer</span>
  <a href="https://fancy.example.com/bread">View</a>
</div>
<div class="sh-dgr__google-result">
  <h3 class="sh-dgr__title">Bargain Bread</h3>
  <span class="sh-dgr__price">$0.50</span>
  <a href="https://bargain.example.com/bread">View</a>
</div>
<div class="sh-dgr__content">
  <h3>Third cheaper listing</h3>
  <span class="price">$1.00</span>
  <a href="/shopping/product/999">View</a>
</div>
</body>
</html>"#;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).expect("valid date")
    }

    fn parse(html: &str, base_price: f64) -> Vec<RawOffer> {
        parse_shopping_html(html, BASE, base_price, today()).expect("should parse")
    }

    #[test]
    fn parse_emits_only_cheaper_listings() {
        let offers = parse(MOCK_HTML, 4.0);
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].title, "Artisan Sourdough Loaf");
        assert_eq!(offers[1].title, "Bargain Bread");
    }

    #[test]
    fn discount_from_price_delta() {
        let offers = parse(MOCK_HTML, 4.0);
        // (4.00 - 3.00) / 4.00 = 25%
        assert_eq!(offers[0].discount, 25);
        assert_eq!(offers[0].discounted_price, Some(3.0));
        assert_eq!(offers[0].merchant.name, "Safeway");
        assert!(offers[0].code.is_none());
        assert_eq!(offers[0].kind, OfferType::Website);
    }

    #[test]
    fn discount_capped_at_fifty() {
        let offers = parse(MOCK_HTML, 4.0);
        // (4.00 - 0.50) / 4.00 = 87.5% → capped
        assert_eq!(offers[1].discount, 50);
        assert_eq!(offers[1].merchant.name, "Google Shopping");
    }

    #[test]
    fn relative_links_resolved_against_google() {
        let offers = parse(MOCK_HTML, 4.0);
        assert_eq!(
            offers[0].product_link,
            "https://www.google.com/shopping/product/123"
        );
        assert_eq!(offers[0].merchant.website, offers[0].product_link);
    }

    #[test]
    fn validity_is_fourteen_days() {
        let offers = parse(MOCK_HTML, 4.0);
        assert_eq!(
            offers[0].valid_until,
            NaiveDate::from_ymd_opt(2026, 10, 31).expect("valid date")
        );
    }

    #[test]
    fn nothing_cheaper_means_no_offers() {
        assert!(parse(MOCK_HTML, 0.25).is_empty());
    }

    #[test]
    fn equal_price_is_not_a_deal() {
        assert!(parse(MOCK_HTML, 0.50)
            .iter()
            .all(|o| o.title != "Bargain Bread"));
    }

    #[test]
    fn price_parsing() {
        let re = Regex::new(PRICE_PATTERN).expect("valid pattern");
        assert_eq!(parse_price("$3.49", &re), Some(3.49));
        assert_eq!(parse_price("$1,299.00 new", &re), Some(1299.0));
        assert_eq!(parse_price("From 12", &re), Some(12.0));
        assert_eq!(parse_price("Out of stock", &re), None);
        assert_eq!(parse_price("$.99", &re), Some(0.99));
        assert_eq!(parse_price("Now .5 off 2", &re), Some(0.5));
    }

    #[test]
    fn sub_dollar_listing_without_leading_zero() {
        let html = r#"<div class="sh-dgr__content">
  <h3>Day-old Rolls</h3>
  <span class="price">$.99</span>
  <a href="/shopping/product/42">View</a>
</div>"#;
        let offers = parse(html, 4.0);
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].discounted_price, Some(0.99));
        assert_eq!(offers[0].discount, 50);

        let near = parse(html, 1.0);
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].discount, 1);
    }

    #[test]
    fn comparison_discount_rounds_and_clamps() {
        assert_eq!(comparison_discount(10.0, 8.75), 13);
        assert_eq!(comparison_discount(10.0, 1.0), 50);
        assert_eq!(comparison_discount(10.0, 10.0), 0);
    }

    #[test]
    fn parse_empty_html_returns_empty() {
        assert!(parse("<html><body></body></html>", 10.0).is_empty());
    }

    #[tokio::test]
    async fn fetch_sends_shopping_query() {
        use wiremock::matchers::{method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("tbm", "shop"))
            .and(query_param("q", "bread coupon discount"))
            .respond_with(ResponseTemplate::new(200).set_body_string(MOCK_HTML))
            .mount(&server)
            .await;

        let source = GoogleShoppingSource::with_base_url(server.uri());
        let offers = source
            .fetch(&OfferQuery::new("bread", 4.0), &SearchConfig::default())
            .await
            .expect("fetch should succeed");
        assert_eq!(offers.len(), 2);
    }

    #[test]
    fn source_is_google_shopping() {
        assert_eq!(GoogleShoppingSource::new().source(), Source::GoogleShopping);
    }
}
