//! Google News RSS search client
//!
//! Issues one bounded-timeout request per configured query variant against
//! the Google News search feed and extracts structured entries from the
//! response. Google News titles carry the source attribution as a
//! `"Title - Source"` suffix, which is split off here.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use newsdesk_core::{sentinel, NewsEntry};

use crate::error::FeedError;
use crate::normalize::{clean_summary, normalize_date};

/// Default Google News RSS search endpoint
const DEFAULT_BASE_URL: &str = "https://news.google.com/rss/search";

/// Locale parameters for Japanese news
const DEFAULT_LOCALE: &str = "hl=ja&gl=JP&ceid=JP:ja";

/// Per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// One feed item before normalization
#[derive(Debug, Clone)]
pub struct RawEntry {
    /// Headline with the source suffix removed
    pub headline: String,
    /// Source name from the title suffix, or the default sentinel
    pub media: String,
    /// Article URL
    pub link: String,
    /// Publish date as it appeared in the feed
    pub pub_date: Option<String>,
    /// Description as it appeared in the feed (may embed markup)
    pub description: Option<String>,
}

/// Google News RSS search client
pub struct GoogleNewsClient {
    client: Client,
    base_url: String,
    locale: String,
}

impl GoogleNewsClient {
    /// Create a client with the given per-request timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent("Mozilla/5.0 (compatible; TeamNewsdesk/1.0)")
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: DEFAULT_BASE_URL.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch and extract the feed for one query variant.
    ///
    /// Fails with a [`FeedError`] the caller treats as "skip this query";
    /// there is no retry.
    pub async fn search(&self, query: &str) -> Result<Vec<RawEntry>, FeedError> {
        let url = format!(
            "{}?q={}&{}",
            self.base_url,
            urlencoding::encode(query),
            self.locale
        );

        debug!("Fetching search feed: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FeedError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FeedError::ApiError {
                status: response.status().as_u16(),
                message: format!("search feed returned status {}", response.status()),
            });
        }

        let content = response
            .bytes()
            .await
            .map_err(|e| FeedError::RequestFailed(e.to_string()))?;

        let entries = parse_channel(&content)?;
        info!("Query '{}' returned {} feed items", query, entries.len());
        Ok(entries)
    }
}

impl Default for GoogleNewsClient {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

/// Parse one feed document into raw entries.
///
/// Items missing a title or link are skipped; they never fail the batch.
pub fn parse_channel(content: &[u8]) -> Result<Vec<RawEntry>, FeedError> {
    let channel = rss::Channel::read_from(content)
        .map_err(|e| FeedError::ParseError(format!("failed to parse search feed: {}", e)))?;

    let entries = channel
        .items()
        .iter()
        .filter_map(|item| {
            let title = match item.title() {
                Some(t) if !t.trim().is_empty() => t,
                _ => {
                    debug!("Skipping feed item without title");
                    return None;
                }
            };
            let link = match item.link() {
                Some(l) if !l.trim().is_empty() => l.to_string(),
                _ => {
                    debug!("Skipping feed item without link: {}", title);
                    return None;
                }
            };

            let (headline, media) = split_source(title);

            Some(RawEntry {
                headline,
                media,
                link,
                pub_date: item.pub_date().map(str::to_string),
                description: item.description().map(str::to_string),
            })
        })
        .collect();

    Ok(entries)
}

/// Split the source attribution off a Google News title.
///
/// Splits on the last `" - "` occurrence; a title without the separator is
/// all headline with the source defaulting to the sentinel.
pub fn split_source(title: &str) -> (String, String) {
    if let Some(pos) = title.rfind(" - ") {
        let headline = title[..pos].trim().to_string();
        let media = title[pos + 3..].trim().to_string();
        (headline, media)
    } else {
        (title.trim().to_string(), sentinel::DEFAULT_MEDIA.to_string())
    }
}

/// Normalize a raw entry into a [`NewsEntry`].
///
/// The category starts at the uncategorized sentinel; classification runs
/// after deduplication.
pub fn normalize_entry(
    raw: RawEntry,
    now: DateTime<Utc>,
    max_summary_chars: usize,
    boilerplate: &[String],
) -> NewsEntry {
    let (timestamp, display_date) = match &raw.pub_date {
        Some(date) => normalize_date(date, now),
        None => (now, "-".to_string()),
    };

    let summary = clean_summary(
        raw.description.as_deref().unwrap_or(""),
        max_summary_chars,
        boilerplate,
    );

    NewsEntry {
        id: entry_id(&raw.link),
        timestamp,
        display_date,
        title: raw.headline,
        media: raw.media,
        summary,
        link: raw.link,
        category: sentinel::UNCATEGORIZED.to_string(),
        tags: Vec::new(),
    }
}

/// Entry identifier: truncated SHA-256 of the link
pub fn entry_id(link: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(link.as_bytes());
    hex::encode(&hasher.finalize()[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::default_boilerplate;
    use chrono::TimeZone;

    const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel>
<title>"オリックス・バファローズ" - Google ニュース</title>
<link>https://news.google.com</link>
<description>Google ニュース</description>
<item>
  <title>岸田監督が就任会見「優勝を取り戻す」 - 日刊スポーツ</title>
  <link>https://example.com/articles/1</link>
  <pubDate>Wed, 26 Nov 2025 04:00:00 GMT</pubDate>
  <description>&lt;a href="https://example.com/articles/1"&gt;就任会見の詳細&lt;/a&gt;</description>
</item>
<item>
  <title>タイトルのみのエントリ</title>
  <link>https://example.com/articles/2</link>
</item>
<item>
  <title>リンクのない壊れたエントリ</title>
</item>
</channel></rss>"#;

    #[test]
    fn test_parse_channel_extracts_items() {
        let entries = parse_channel(SAMPLE_FEED.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].headline, "岸田監督が就任会見「優勝を取り戻す」");
        assert_eq!(entries[0].media, "日刊スポーツ");
        assert_eq!(entries[0].link, "https://example.com/articles/1");
        assert_eq!(
            entries[0].pub_date.as_deref(),
            Some("Wed, 26 Nov 2025 04:00:00 GMT")
        );
    }

    #[test]
    fn test_malformed_items_are_skipped_not_fatal() {
        let entries = parse_channel(SAMPLE_FEED.as_bytes()).unwrap();
        assert!(entries.iter().all(|e| !e.link.is_empty()));
    }

    #[test]
    fn test_invalid_document_is_a_parse_error() {
        let result = parse_channel(b"this is not xml");
        assert!(matches!(result, Err(FeedError::ParseError(_))));
    }

    #[test]
    fn test_split_source_on_last_separator() {
        let (headline, media) = split_source("山本 - 由伸が快投 - スポニチ");
        assert_eq!(headline, "山本 - 由伸が快投");
        assert_eq!(media, "スポニチ");
    }

    #[test]
    fn test_split_source_defaults_to_sentinel() {
        let (headline, media) = split_source("区切りのないタイトル");
        assert_eq!(headline, "区切りのないタイトル");
        assert_eq!(media, sentinel::DEFAULT_MEDIA);
    }

    #[test]
    fn test_normalize_entry_populates_all_fields() {
        let now = Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap();
        let entries = parse_channel(SAMPLE_FEED.as_bytes()).unwrap();
        let entry = normalize_entry(
            entries[0].clone(),
            now,
            120,
            &default_boilerplate(),
        );

        assert_eq!(entry.display_date, "2025-11-26 13:00");
        assert_eq!(entry.summary, "就任会見の詳細");
        assert_eq!(entry.category, sentinel::UNCATEGORIZED);
        assert_eq!(entry.id, entry_id("https://example.com/articles/1"));
        assert!(!entry.id.is_empty());
    }

    #[test]
    fn test_normalize_entry_without_date_sorts_as_now() {
        let now = Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap();
        let entries = parse_channel(SAMPLE_FEED.as_bytes()).unwrap();
        let entry = normalize_entry(entries[1].clone(), now, 120, &[]);

        assert_eq!(entry.timestamp, now);
        assert_eq!(entry.summary, sentinel::NO_SUMMARY);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_request_failed() {
        // Discard port on loopback: refused without leaving the machine
        let client = GoogleNewsClient::new(Duration::from_millis(500))
            .with_base_url("http://127.0.0.1:9/rss/search");
        let result = client.search("オリックス").await;
        assert!(matches!(result, Err(FeedError::RequestFailed(_))));
    }

    #[test]
    fn test_entry_id_is_stable() {
        assert_eq!(
            entry_id("https://example.com/a"),
            entry_id("https://example.com/a")
        );
        assert_ne!(
            entry_id("https://example.com/a"),
            entry_id("https://example.com/b")
        );
    }
}
