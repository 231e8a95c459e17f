//! Two-stage deduplication
//!
//! Stage one drops exact repeats by link across all query variants of one
//! run. Stage two walks the survivors newest-first and drops any title
//! that is too similar to an already-accepted one, so the same story
//! reported by several outlets collapses to its most recent version.
//!
//! The pairwise title scan is O(n²) but n is one aggregation cycle, tens
//! to low hundreds of entries.

use std::collections::HashSet;

use newsdesk_core::NewsEntry;
use tracing::debug;

/// Default similarity threshold above which two titles are near-duplicates
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.6;

/// Cross-query deduplicator with an injectable similarity measure
pub struct Deduplicator {
    threshold: f64,
    similarity: fn(&str, &str) -> f64,
}

impl Deduplicator {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            similarity: strsim::normalized_levenshtein,
        }
    }

    /// Replace the similarity measure (tests).
    pub fn with_similarity(mut self, similarity: fn(&str, &str) -> f64) -> Self {
        self.similarity = similarity;
        self
    }

    /// Both stages: exact link dedup, then fuzzy title dedup.
    pub fn dedup(&self, entries: Vec<NewsEntry>) -> Vec<NewsEntry> {
        self.dedup_titles(dedup_links(entries))
    }

    /// Fuzzy stage: iterate newest-first, dropping any candidate whose
    /// title similarity against an accepted title exceeds the threshold.
    /// Iteration order makes the most recent version of a story survive.
    pub fn dedup_titles(&self, mut entries: Vec<NewsEntry>) -> Vec<NewsEntry> {
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let mut accepted: Vec<NewsEntry> = Vec::with_capacity(entries.len());
        for candidate in entries {
            let duplicate = accepted.iter().find(|kept| {
                (self.similarity)(&kept.title, &candidate.title) > self.threshold
            });
            match duplicate {
                Some(kept) => {
                    debug!(
                        "Dropping near-duplicate title '{}' (kept '{}')",
                        candidate.title, kept.title
                    );
                }
                None => accepted.push(candidate),
            }
        }
        accepted
    }
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

/// Exact stage: first occurrence of each link wins, order preserved.
pub fn dedup_links(entries: Vec<NewsEntry>) -> Vec<NewsEntry> {
    let mut seen: HashSet<String> = HashSet::with_capacity(entries.len());
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.link.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use newsdesk_core::sentinel;
    use std::collections::HashSet;

    fn entry(title: &str, link: &str, ts: DateTime<Utc>) -> NewsEntry {
        NewsEntry {
            id: link.to_string(),
            timestamp: ts,
            display_date: ts.format("%Y-%m-%d %H:%M").to_string(),
            title: title.to_string(),
            media: sentinel::DEFAULT_MEDIA.to_string(),
            summary: sentinel::NO_SUMMARY.to_string(),
            link: link.to_string(),
            category: sentinel::UNCATEGORIZED.to_string(),
            tags: vec![],
        }
    }

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 26, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_link_dedup_keeps_first_occurrence() {
        let entries = vec![
            entry("a", "https://example.com/1", ts(1)),
            entry("b", "https://example.com/2", ts(2)),
            entry("c", "https://example.com/1", ts(3)),
        ];
        let deduped = dedup_links(entries);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].title, "a");
    }

    #[test]
    fn test_link_uniqueness_invariant() {
        let entries = vec![
            entry("a", "https://example.com/1", ts(1)),
            entry("b", "https://example.com/1", ts(2)),
            entry("c", "https://example.com/2", ts(3)),
            entry("d", "https://example.com/2", ts(4)),
        ];
        let deduped = Deduplicator::default().dedup(entries);
        let links: HashSet<&str> = deduped.iter().map(|e| e.link.as_str()).collect();
        assert_eq!(links.len(), deduped.len());
    }

    #[test]
    fn test_similarity_at_threshold_survives() {
        let dedup = Deduplicator::new(0.6).with_similarity(|_, _| 0.6);
        let entries = vec![
            entry("x", "https://example.com/1", ts(2)),
            entry("y", "https://example.com/2", ts(1)),
        ];
        // Exactly at the threshold is not a duplicate
        assert_eq!(dedup.dedup(entries).len(), 2);
    }

    #[test]
    fn test_similarity_above_threshold_collapses_to_most_recent() {
        let dedup = Deduplicator::new(0.6).with_similarity(|_, _| 0.61);
        let entries = vec![
            entry("older version", "https://example.com/1", ts(1)),
            entry("newer version", "https://example.com/2", ts(2)),
        ];
        let deduped = dedup.dedup(entries);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].title, "newer version");
    }

    #[test]
    fn test_near_identical_japanese_titles_collapse() {
        let dedup = Deduplicator::default();
        let entries = vec![
            entry(
                "オリックス・山下舜平大が完封勝利",
                "https://example.com/1",
                ts(2),
            ),
            entry(
                "オリックス・山下舜平大が完封勝利!",
                "https://example.com/2",
                ts(1),
            ),
            entry("阪神がドラフト1位指名を公表", "https://example.com/3", ts(3)),
        ];
        let deduped = dedup.dedup(entries);
        assert_eq!(deduped.len(), 2);
        assert!(deduped
            .iter()
            .any(|e| e.link == "https://example.com/1"));
        assert!(deduped
            .iter()
            .any(|e| e.link == "https://example.com/3"));
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let dedup = Deduplicator::default();
        let entries = vec![
            entry("オリックスが契約更改を発表", "https://example.com/1", ts(1)),
            entry("オリックスが契約更改を発表か", "https://example.com/2", ts(2)),
            entry("宮城が先発ローテ入りへ", "https://example.com/3", ts(3)),
            entry("宮城が先発ローテ入りへ", "https://example.com/3", ts(3)),
        ];
        let once = dedup.dedup(entries);
        let twice = dedup.dedup(once.clone());

        let once_links: Vec<&str> = once.iter().map(|e| e.link.as_str()).collect();
        let twice_links: Vec<&str> = twice.iter().map(|e| e.link.as_str()).collect();
        assert_eq!(once_links, twice_links);
    }
}
