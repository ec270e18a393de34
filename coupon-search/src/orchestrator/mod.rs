//! Aggregation pipeline: concurrent source queries, dedup, preferences, ranking.
//!
//! This module fans out an offer query to every registered source
//! concurrently, merges whatever each one returned in registration order,
//! deduplicates by merchant and code (or title), applies caller preferences,
//! and returns a sorted, truncated offer list.

pub mod aggregate;
pub mod dedup;
pub mod preferences;
pub mod ranking;
