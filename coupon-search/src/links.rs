//! Link resolution for offers.
//!
//! Listing pages mix absolute links, root-relative paths and bare
//! fragments. Every link on an [`Offer`](crate::types::Offer) must be an
//! absolute `http`/`https` URL, so sources resolve hrefs against their own
//! site root before emitting offers, and the aggregator re-checks.

use url::Url;

/// Resolve `href` against `base`, returning an absolute `http(s)` URL.
///
/// - Absolute `http`/`https` hrefs are returned as-is (after parsing).
/// - Relative paths, protocol-relative and query-only hrefs are joined
///   against `base`.
/// - An empty href resolves to `base` itself.
/// - Anything that does not end up as `http`/`https` (`javascript:`,
///   `mailto:`, an unparsable base) yields `None`.
///
/// # Examples
///
/// ```
/// use coupon_search::links::resolve_link;
///
/// let link = resolve_link("https://www.retailmenot.com", "/view/target.com");
/// assert_eq!(link.as_deref(), Some("https://www.retailmenot.com/view/target.com"));
/// ```
pub fn resolve_link(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    let resolved = match Url::parse(href) {
        Ok(absolute) => absolute,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(base).ok()?.join(href).ok()?,
        Err(_) => return None,
    };
    is_http(&resolved).then(|| resolved.to_string())
}

/// Returns `true` if `link` parses as an absolute `http`/`https` URL.
pub fn is_absolute_http(link: &str) -> bool {
    Url::parse(link).is_ok_and(|u| is_http(&u))
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && url.has_host()
}
