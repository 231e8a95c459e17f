//! Feed ingestion and normalization for the team newsdesk
//!
//! This crate covers the pipeline from raw search-feed bytes to normalized
//! [`newsdesk_core::NewsEntry`] values:
//! - Google News RSS search client (one request per query variant)
//! - timestamp normalization into the JST display zone
//! - summary cleaning (markup stripping, boilerplate removal, truncation)
//! - relevance filtering against the tracked team's terms and aliases
//! - two-stage deduplication (exact link, fuzzy title)
//! - ordered rule-based topic classification

pub mod classify;
pub mod dedup;
pub mod error;
pub mod google_news;
pub mod normalize;
pub mod relevance;

pub use classify::{ClassifyRule, RuleClassifier};
pub use dedup::Deduplicator;
pub use error::FeedError;
pub use google_news::{GoogleNewsClient, RawEntry};
pub use relevance::RelevanceFilter;
