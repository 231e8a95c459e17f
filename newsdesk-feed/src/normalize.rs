//! Timestamp and summary normalization
//!
//! Feed dates arrive as RFC 2822 strings in arbitrary zones and are
//! displayed in JST; descriptions arrive as HTML fragments padded with
//! aggregator boilerplate.

use chrono::{DateTime, FixedOffset, Utc};

/// Display timezone offset: JST (UTC+9, no DST)
const TARGET_OFFSET_SECS: i32 = 9 * 3600;

/// Display format for normalized dates
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Boilerplate substrings removed from cleaned summaries
pub fn default_boilerplate() -> Vec<String> {
    [
        "続きを読む",
        "記事全文を読む",
        "Google ニュースですべての記事を表示",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Normalize a feed date string into a sortable instant and a JST display
/// string.
///
/// Unzoned input is assumed to be UTC. On parse failure the entry sorts as
/// `now` and the raw string is kept for display, so a malformed date is
/// still visible to the reader.
pub fn normalize_date(raw: &str, now: DateTime<Utc>) -> (DateTime<Utc>, String) {
    let parsed = DateTime::parse_from_rfc2822(raw.trim())
        .or_else(|_| DateTime::parse_from_rfc3339(raw.trim()))
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M:%S")
                .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
        });

    match parsed {
        Ok(timestamp) => {
            let offset = FixedOffset::east_opt(TARGET_OFFSET_SECS)
                .expect("static JST offset is in range");
            let display = timestamp
                .with_timezone(&offset)
                .format(DISPLAY_FORMAT)
                .to_string();
            (timestamp, display)
        }
        Err(_) => (now, raw.trim().to_string()),
    }
}

/// Clean a raw description field into a bounded display summary.
///
/// Strips markup, collapses whitespace, removes boilerplate phrases, and
/// truncates to `max_chars` characters (not bytes; summaries are Japanese)
/// with an ellipsis. An empty result maps to the no-summary placeholder.
pub fn clean_summary(raw: &str, max_chars: usize, boilerplate: &[String]) -> String {
    let mut text = strip_html(raw);

    for phrase in boilerplate {
        if !phrase.is_empty() {
            text = text.replace(phrase.as_str(), " ");
        }
    }

    let mut text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if text.chars().count() > max_chars {
        text = text.chars().take(max_chars).collect::<String>();
        // Don't leave a dangling space before the ellipsis
        text.truncate(text.trim_end().len());
        text.push('…');
    }

    if text.is_empty() {
        newsdesk_core::sentinel::NO_SUMMARY.to_string()
    } else {
        text
    }
}

/// Simple HTML stripping
fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}
