//! News data structures for team news aggregation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fallback and placeholder values shared across the pipeline.
pub mod sentinel {
    /// Source name when the feed title carries no attribution
    pub const DEFAULT_MEDIA: &str = "News";
    /// Summary shown when the description is empty after cleaning
    pub const NO_SUMMARY: &str = "詳細はありません";
    /// Category assigned when no classification rule matches
    pub const UNCATEGORIZED: &str = "その他";
    /// Media field of the total-failure placeholder entry
    pub const ERROR_MEDIA: &str = "System";
    /// Category of the total-failure placeholder entry
    pub const ERROR_CATEGORY: &str = "エラー";
    /// Title of the total-failure placeholder entry
    pub const ERROR_TITLE: &str = "ニュースの取得に失敗しました";
    /// Summary of the total-failure placeholder entry
    pub const ERROR_SUMMARY: &str = "時間をおいて再読み込みしてください。";
    /// Link of the total-failure placeholder entry
    pub const ERROR_LINK: &str = "#";
}

/// One feed item after normalization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsEntry {
    /// Unique identifier (truncated SHA-256 of the link)
    pub id: String,
    /// Canonical sort key; falls back to fetch time when the feed date
    /// cannot be parsed
    pub timestamp: DateTime<Utc>,
    /// Human-readable date in the target timezone; on parse failure this
    /// is the raw feed string so the reader still sees something
    pub display_date: String,
    /// Headline with the source attribution removed
    pub title: String,
    /// Source name extracted from the title
    pub media: String,
    /// Cleaned, truncated description
    pub summary: String,
    /// Canonical article URL; unique within one collection
    pub link: String,
    /// Single topic label; never empty
    pub category: String,
    /// Multi-label classification output
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewsEntry {
    /// The single synthetic entry returned when every query failed,
    /// so the presentation layer always has something renderable.
    pub fn error_placeholder(now: DateTime<Utc>) -> Self {
        Self {
            id: String::new(),
            timestamp: now,
            display_date: "-".to_string(),
            title: sentinel::ERROR_TITLE.to_string(),
            media: sentinel::ERROR_MEDIA.to_string(),
            summary: sentinel::ERROR_SUMMARY.to_string(),
            link: sentinel::ERROR_LINK.to_string(),
            category: sentinel::ERROR_CATEGORY.to_string(),
            tags: Vec::new(),
        }
    }
}

/// Ordering of a collection by publish time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// The ordered result of one aggregation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsCollection {
    /// Entries sorted by `timestamp` per the collection's order
    pub items: Vec<NewsEntry>,
    /// When this collection was assembled
    pub fetched_at: DateTime<Utc>,
}

impl NewsCollection {
    /// Build a collection sorted newest-first.
    pub fn new(mut items: Vec<NewsEntry>, fetched_at: DateTime<Utc>) -> Self {
        items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Self { items, fetched_at }
    }

    /// Re-sort the entries in place.
    pub fn sort(&mut self, order: SortOrder) {
        match order {
            SortOrder::NewestFirst => self.items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
            SortOrder::OldestFirst => self.items.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether this is the degenerate collection produced when every
    /// configured query failed.
    pub fn is_error_placeholder(&self) -> bool {
        self.items.len() == 1 && self.items[0].category == sentinel::ERROR_CATEGORY
    }
}
