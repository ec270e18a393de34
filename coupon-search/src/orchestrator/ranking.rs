//! Ranking: discount-descending stable sort and truncation.

use crate::types::Offer;

/// Sort offers by discount, highest first, and keep at most `max_results`.
///
/// The sort is stable: offers with equal discounts keep their incoming
/// order, which is the source registration order after deduplication.
pub fn rank(offers: &mut Vec<Offer>, max_results: usize) {
    offers.sort_by(|a, b| b.discount.cmp(&a.discount));
    offers.truncate(max_results);
}
