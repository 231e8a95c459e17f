//! News aggregation pipeline
//!
//! One aggregation run fetches every configured query variant in sequence,
//! normalizes and filters the entries, deduplicates across queries, and
//! classifies what remains. A failing query contributes zero entries; only
//! when every query fails does the run degrade to the single placeholder
//! entry, so the caller always gets a renderable collection.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use newsdesk_core::{NewsCollection, NewsEntry};
use newsdesk_feed::classify::{default_personnel, default_rules, ClassifyRule};
use newsdesk_feed::google_news::{normalize_entry, DEFAULT_TIMEOUT};
use newsdesk_feed::normalize::default_boilerplate;
use newsdesk_feed::{Deduplicator, FeedError, GoogleNewsClient, RawEntry, RelevanceFilter, RuleClassifier};

/// Tunables for one aggregation pipeline
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Query variants, fetched one after another
    pub queries: Vec<String>,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// How long a cached collection stays fresh
    pub cache_ttl: Duration,
    /// Display length cap for summaries, in characters
    pub max_summary_chars: usize,
    /// Boilerplate substrings stripped from summaries
    pub boilerplate: Vec<String>,
    /// Title-similarity threshold for near-duplicate suppression
    pub similarity_threshold: f64,
    /// Team name variants for the relevance filter
    pub relevance_terms: Vec<String>,
    /// Personnel names and short-form tags accepted as relevant
    pub relevance_aliases: Vec<String>,
    /// Classification rule table, ordered by priority
    pub classify_rules: Vec<ClassifyRule>,
    /// Personnel names tagged verbatim by the multi-label classifier
    pub personnel: Vec<String>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            queries: vec![
                "オリックス・バファローズ".to_string(),
                "オリックス 野球".to_string(),
            ],
            request_timeout: DEFAULT_TIMEOUT,
            cache_ttl: Duration::from_secs(30 * 60),
            max_summary_chars: 120,
            boilerplate: default_boilerplate(),
            similarity_threshold: newsdesk_feed::dedup::DEFAULT_SIMILARITY_THRESHOLD,
            relevance_terms: vec!["オリックス".to_string(), "バファローズ".to_string()],
            relevance_aliases: vec![
                "岸田".to_string(),
                "中嶋".to_string(),
                "Bs".to_string(),
            ],
            classify_rules: default_rules(),
            personnel: default_personnel(),
        }
    }
}

/// The full ingestion-and-normalization pipeline
pub struct NewsAggregator {
    client: GoogleNewsClient,
    filter: RelevanceFilter,
    dedup: Deduplicator,
    classifier: RuleClassifier,
    config: AggregatorConfig,
}

impl NewsAggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self {
            client: GoogleNewsClient::new(config.request_timeout),
            filter: RelevanceFilter::new(
                config.relevance_terms.clone(),
                config.relevance_aliases.clone(),
            ),
            dedup: Deduplicator::new(config.similarity_threshold),
            classifier: RuleClassifier::new(
                config.classify_rules.clone(),
                config.personnel.clone(),
            ),
            config,
        }
    }

    /// Replace the feed client (tests).
    pub fn with_client(mut self, client: GoogleNewsClient) -> Self {
        self.client = client;
        self
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Run the whole pipeline once. Never fails: total fetch failure
    /// produces the placeholder collection instead.
    #[instrument(skip(self))]
    pub async fn aggregate(&self) -> NewsCollection {
        let now = Utc::now();

        let mut results = Vec::with_capacity(self.config.queries.len());
        for query in &self.config.queries {
            let result = self.client.search(query).await;
            if let Err(e) = &result {
                warn!("Query '{}' failed, skipping: {}", query, e);
            }
            results.push(result);
        }

        let collection = self.assemble(results, now);
        info!(
            "Aggregation run produced {} entries (placeholder: {})",
            collection.len(),
            collection.is_error_placeholder()
        );
        collection
    }

    /// Pure assembly of per-query results into the final collection.
    fn assemble(
        &self,
        results: Vec<Result<Vec<RawEntry>, FeedError>>,
        now: DateTime<Utc>,
    ) -> NewsCollection {
        let mut any_success = false;
        let mut entries: Vec<NewsEntry> = Vec::new();

        for result in results {
            match result {
                Ok(raws) => {
                    any_success = true;
                    for raw in raws {
                        if !self.filter.is_relevant(&raw.headline) {
                            continue;
                        }
                        entries.push(normalize_entry(
                            raw,
                            now,
                            self.config.max_summary_chars,
                            &self.config.boilerplate,
                        ));
                    }
                }
                // Already logged at fetch time; a failed query just
                // contributes nothing
                Err(_) => {}
            }
        }

        if !any_success {
            return NewsCollection::new(vec![NewsEntry::error_placeholder(now)], now);
        }

        let mut entries = self.dedup.dedup(entries);

        for entry in &mut entries {
            entry.category = self.classifier.classify(&entry.title, Some(&entry.summary));
            entry.tags = self.classifier.tags(&entry.title, Some(&entry.summary));
        }

        NewsCollection::new(entries, now)
    }
}

impl Default for NewsAggregator {
    fn default() -> Self {
        Self::new(AggregatorConfig::default())
    }
}
