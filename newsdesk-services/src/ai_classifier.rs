//! Batched remote-model classification
//!
//! Optional override of the rule-based labels: entries are grouped into
//! fixed-size batches of `{id, title}` pairs and sent to a chat-completion
//! model with the taxonomy in the system prompt. A batch whose response
//! cannot be parsed keeps its rule-based labels; a missing credential
//! disables the pass entirely. Batches are separated by a short pause to
//! respect downstream rate limits.

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use newsdesk_core::{NewsCollection, NewsdeskError};

/// Tunables for the remote classification pass
#[derive(Debug, Clone)]
pub struct AiClassifierConfig {
    /// Chat-completion model identifier
    pub model: String,
    /// Entries per request
    pub batch_size: usize,
    /// Pause between batches
    pub inter_batch_delay: Duration,
    /// Labels the model may choose from
    pub taxonomy: Vec<String>,
}

impl Default for AiClassifierConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            batch_size: 25,
            inter_batch_delay: Duration::from_secs(1),
            taxonomy: ["表彰", "ドラフト", "移籍・FA", "契約更改", "試合", "その他"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

/// One `{id, title}` pair sent to the model
#[derive(Debug, Serialize)]
struct BatchItem<'a> {
    id: &'a str,
    title: &'a str,
}

/// One labelled id in the model's response
#[derive(Debug, Deserialize)]
struct BatchLabel {
    id: String,
    category: String,
}

/// Batched remote classifier over a chat-completion API
pub struct AiClassifier {
    client: Option<Client<OpenAIConfig>>,
    config: AiClassifierConfig,
}

impl AiClassifier {
    /// A `None` or empty credential yields a disabled classifier whose
    /// `reclassify` is a no-op, so the pipeline degrades to rule-based
    /// labels without special-casing at the call site.
    pub fn new(api_key: Option<String>, config: AiClassifierConfig) -> Self {
        let client = match api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Some(Client::with_config(
                OpenAIConfig::new().with_api_key(key),
            )),
            _ => None,
        };
        Self { client, config }
    }

    /// Overwrite `category` (and extend `tags`) for every entry the model
    /// labelled. Entries in failed batches keep their prior labels.
    #[instrument(skip(self, collection))]
    pub async fn reclassify(&self, mut collection: NewsCollection) -> NewsCollection {
        let Some(client) = &self.client else {
            warn!("No classification credential configured, keeping rule-based labels");
            return collection;
        };

        let batch_size = self.config.batch_size.max(1);
        let pairs: Vec<(String, String)> = collection
            .items
            .iter()
            .map(|entry| (entry.id.clone(), entry.title.clone()))
            .collect();
        let batch_count = pairs.len().div_ceil(batch_size);

        for (index, batch) in pairs.chunks(batch_size).enumerate() {
            match self.classify_batch(client, batch).await {
                Ok(labels) => {
                    let applied = apply_labels(&mut collection, &labels, &self.config.taxonomy);
                    info!(
                        "Batch {}/{}: applied {} of {} labels",
                        index + 1,
                        batch_count,
                        applied,
                        labels.len()
                    );
                }
                Err(e) => {
                    warn!(
                        "Batch {}/{} failed, keeping prior labels: {}",
                        index + 1,
                        batch_count,
                        e
                    );
                }
            }

            if index + 1 < batch_count {
                tokio::time::sleep(self.config.inter_batch_delay).await;
            }
        }

        collection
    }

    async fn classify_batch(
        &self,
        client: &Client<OpenAIConfig>,
        batch: &[(String, String)],
    ) -> Result<Vec<BatchLabel>, NewsdeskError> {
        let items: Vec<BatchItem<'_>> = batch
            .iter()
            .map(|(id, title)| BatchItem { id, title })
            .collect();
        let payload = serde_json::to_string(&items)
            .map_err(|e| NewsdeskError::internal(e.to_string()))?;

        let system_prompt = format!(
            r#"You are classifying Japanese baseball news headlines about a single team.

Assign each headline exactly one category from this taxonomy:
{}

Rules:
- "表彰" covers awards, titles, and honors, even when salary is mentioned.
- "契約更改" covers contract renewals and salary negotiations.
- "移籍・FA" covers transfers, free agency, trades, and roster departures.
- "ドラフト" covers the draft and draft picks.
- "試合" covers game reports and on-field performance.
- Use "その他" when nothing fits.

Respond with only a JSON array in this exact format:
[{{"id": "<id from the input>", "category": "<one taxonomy label>"}}]"#,
            self.config.taxonomy.join(", ")
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()
                    .map_err(|e| NewsdeskError::internal(e.to_string()))?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(payload)
                    .build()
                    .map_err(|e| NewsdeskError::internal(e.to_string()))?
                    .into(),
            ])
            .temperature(0.0)
            .build()
            .map_err(|e| NewsdeskError::internal(e.to_string()))?;

        let response = client
            .chat()
            .create(request)
            .await
            .map_err(|e| NewsdeskError::api(format!("classification API error: {}", e)))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| NewsdeskError::parse("empty classification response"))?;

        parse_batch_response(content)
    }
}

/// Parse the model's free-text response into batch labels.
fn parse_batch_response(content: &str) -> Result<Vec<BatchLabel>, NewsdeskError> {
    let json = extract_json(content)?;
    serde_json::from_str(&json)
        .map_err(|e| NewsdeskError::parse(format!("malformed batch response: {}", e)))
}

/// Overwrite matched entries' categories in place; labels outside the
/// taxonomy or with unknown ids are ignored. Returns how many applied.
fn apply_labels(
    collection: &mut NewsCollection,
    labels: &[BatchLabel],
    taxonomy: &[String],
) -> usize {
    let mut applied = 0;
    for label in labels {
        if !taxonomy.iter().any(|t| t == &label.category) {
            warn!(
                "Ignoring label outside taxonomy for {}: {}",
                label.id, label.category
            );
            continue;
        }
        if let Some(entry) = collection.items.iter_mut().find(|e| e.id == label.id) {
            entry.category = label.category.clone();
            if !entry.tags.contains(&label.category) {
                entry.tags.push(label.category.clone());
            }
            applied += 1;
        }
    }
    applied
}

/// Extract JSON from a response that might contain markdown code blocks.
fn extract_json(content: &str) -> Result<String, NewsdeskError> {
    // Try to find JSON in code blocks first
    if let Some(start) = content.find("```json") {
        let start = start + 7;
        if let Some(end) = content[start..].find("```") {
            return Ok(content[start..start + end].trim().to_string());
        }
    }

    // Try plain code blocks
    if let Some(start) = content.find("```") {
        let start = start + 3;
        // Skip language identifier if present
        let start = content[start..]
            .find('\n')
            .map(|n| start + n + 1)
            .unwrap_or(start);
        if let Some(end) = content[start..].find("```") {
            return Ok(content[start..start + end].trim().to_string());
        }
    }

    // Try raw JSON, arrays before objects since a batch is an array
    if let Some(start) = content.find('[') {
        if let Some(end) = content.rfind(']') {
            if end > start {
                return Ok(content[start..=end].to_string());
            }
        }
    }
    if let Some(start) = content.find('{') {
        if let Some(end) = content.rfind('}') {
            if end > start {
                return Ok(content[start..=end].to_string());
            }
        }
    }

    Err(NewsdeskError::parse("no JSON found in response"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use newsdesk_core::{sentinel, NewsEntry};

    fn collection() -> NewsCollection {
        let now = Utc.with_ymd_and_hms(2025, 11, 26, 4, 0, 0).unwrap();
        let entry = |id: &str, title: &str, category: &str| NewsEntry {
            id: id.to_string(),
            timestamp: now,
            display_date: "2025-11-26 13:00".to_string(),
            title: title.to_string(),
            media: "日刊スポーツ".to_string(),
            summary: sentinel::NO_SUMMARY.to_string(),
            link: format!("https://example.com/{id}"),
            category: category.to_string(),
            tags: vec![category.to_string()],
        };
        NewsCollection::new(
            vec![
                entry("aaa", "宮城が契約更改にサイン", "契約更改"),
                entry("bbb", "杉本がMVPを受賞", sentinel::UNCATEGORIZED),
            ],
            now,
        )
    }

    #[test]
    fn test_extract_json_from_fenced_block() {
        let content = "Here you go:\n```json\n[{\"id\": \"aaa\", \"category\": \"表彰\"}]\n```";
        let json = extract_json(content).unwrap();
        assert_eq!(json, "[{\"id\": \"aaa\", \"category\": \"表彰\"}]");
    }

    #[test]
    fn test_extract_json_from_plain_block() {
        let content = "```\n[{\"id\": \"aaa\", \"category\": \"表彰\"}]\n```";
        let json = extract_json(content).unwrap();
        assert!(json.starts_with('['));
    }

    #[test]
    fn test_extract_json_raw_array() {
        let content = "The labels are [{\"id\": \"aaa\", \"category\": \"表彰\"}] as requested.";
        let json = extract_json(content).unwrap();
        assert_eq!(json, "[{\"id\": \"aaa\", \"category\": \"表彰\"}]");
    }

    #[test]
    fn test_extract_json_rejects_prose() {
        assert!(extract_json("I could not classify these headlines.").is_err());
    }

    #[test]
    fn test_malformed_response_leaves_categories_unchanged() {
        let collection = collection();
        let before: Vec<String> = collection.items.iter().map(|e| e.category.clone()).collect();

        // The whole batch is discarded when the response is not valid JSON
        assert!(parse_batch_response("not json at all").is_err());
        // Same for a JSON shape that is not an array of labels
        assert!(parse_batch_response("{\"oops\": true}").is_err());

        let after: Vec<String> = collection.items.iter().map(|e| e.category.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_apply_labels_overwrites_matched_ids() {
        let mut collection = collection();
        let labels = parse_batch_response(
            "[{\"id\": \"bbb\", \"category\": \"表彰\"}, {\"id\": \"zzz\", \"category\": \"試合\"}]",
        )
        .unwrap();

        let taxonomy = AiClassifierConfig::default().taxonomy;
        let applied = apply_labels(&mut collection, &labels, &taxonomy);

        assert_eq!(applied, 1);
        assert_eq!(collection.items[1].category, "表彰");
        assert!(collection.items[1].tags.contains(&"表彰".to_string()));
        // Unmatched entry keeps its rule-based label
        assert_eq!(collection.items[0].category, "契約更改");
    }

    #[test]
    fn test_apply_labels_ignores_labels_outside_taxonomy() {
        let mut collection = collection();
        let labels =
            parse_batch_response("[{\"id\": \"aaa\", \"category\": \"宇宙\"}]").unwrap();

        let taxonomy = AiClassifierConfig::default().taxonomy;
        let applied = apply_labels(&mut collection, &labels, &taxonomy);

        assert_eq!(applied, 0);
        assert_eq!(collection.items[0].category, "契約更改");
    }

    #[tokio::test]
    async fn test_missing_credential_degrades_to_noop() {
        let classifier = AiClassifier::new(None, AiClassifierConfig::default());
        let before = collection();
        let before_categories: Vec<String> =
            before.items.iter().map(|e| e.category.clone()).collect();

        let after = classifier.reclassify(before).await;
        let after_categories: Vec<String> =
            after.items.iter().map(|e| e.category.clone()).collect();
        assert_eq!(before_categories, after_categories);
    }

    #[tokio::test]
    async fn test_empty_credential_degrades_to_noop() {
        let classifier = AiClassifier::new(Some("  ".to_string()), AiClassifierConfig::default());
        let after = classifier.reclassify(collection()).await;
        assert_eq!(after.len(), 2);
    }
}
