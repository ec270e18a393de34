//! Outbound HTTP for the scraped deal sources.
//!
//! Every scraping fetch builds its client here so that timeouts, cookies
//! and the browser identity presented to deal sites stay consistent.

use rand::Rng;

use crate::config::SearchConfig;
use crate::error::SearchError;

/// Desktop and mobile browser identities presented to deal sites.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/128.0.0.0 Safari/537.36 Edg/128.0.0.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_6) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.6 Safari/605.1.15",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.6 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/128.0.0.0 Mobile Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:129.0) Gecko/20100101 Firefox/129.0",
];

/// Redirect hops followed before giving up; coupon landing pages chain a few.
const MAX_REDIRECTS: usize = 10;

/// Client for one source fetch.
///
/// Cookies are kept for the lifetime of the client so consent and region
/// redirects resolve. The request timeout is the configured per-source
/// timeout.
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .user_agent(user_agent_for(config, &mut rand::thread_rng()))
        .cookie_store(true)
        .timeout(config.timeout())
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()
        .map_err(|e| SearchError::Http(format!("cannot build deal-site client: {e}")))
}

/// The configured User-Agent, or one drawn from the rotation with `rng`.
fn user_agent_for<R: Rng>(config: &SearchConfig, rng: &mut R) -> String {
    match config.user_agent.as_deref().map(str::trim) {
        Some(custom) if !custom.is_empty() => custom.to_string(),
        _ => USER_AGENTS[rng.gen_range(0..USER_AGENTS.len())].to_string(),
    }
}

/// Fetch `url` with `params` and return the response body as text.
///
/// Non-success statuses are reported as [`SearchError::Http`], and a
/// client-side timeout as [`SearchError::Timeout`], both prefixed with the
/// source name for diagnostics.
pub async fn get_html(
    client: &reqwest::Client,
    source: &str,
    url: &str,
    params: &[(&str, &str)],
) -> Result<String, SearchError> {
    let response = client
        .get(url)
        .query(params)
        .header("Accept", "text/html,application/xhtml+xml")
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| request_error(source, "request failed", e))?
        .error_for_status()
        .map_err(|e| SearchError::Http(format!("{source} HTTP error: {e}")))?;

    response
        .text()
        .await
        .map_err(|e| request_error(source, "response read failed", e))
}

fn request_error(source: &str, what: &str, err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        SearchError::Timeout(format!("{source} {what}: {err}"))
    } else {
        SearchError::Http(format!("{source} {what}: {err}"))
    }
}
