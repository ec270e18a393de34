//! Offer source implementations.
//!
//! Each module provides a struct implementing [`crate::source::SourceAdapter`]
//! for one third-party source.

pub mod google_shopping;
pub mod honey;
pub mod retailmenot;

use std::sync::Arc;

use scraper::{ElementRef, Selector};

use crate::error::SearchError;
use crate::source::SourceAdapter;
use crate::types::Source;

pub use google_shopping::GoogleShoppingSource;
pub use honey::HoneySource;
pub use retailmenot::RetailMeNotSource;

/// Build the production adapter for a [`Source`].
pub fn adapter_for(source: Source) -> Arc<dyn SourceAdapter> {
    match source {
        Source::RetailMeNot => Arc::new(RetailMeNotSource::new()),
        Source::Honey => Arc::new(HoneySource),
        Source::GoogleShopping => Arc::new(GoogleShoppingSource::new()),
    }
}

pub(crate) fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Parse(format!("invalid selector {css}: {e:?}")))
}

/// Trimmed text of the first descendant matching `sel`, or empty.
pub(crate) fn first_text(element: &ElementRef<'_>, sel: &Selector) -> String {
    element
        .select(sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}
