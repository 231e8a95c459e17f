//! Rule-based topic classification
//!
//! An ordered table of (label, keywords) rules evaluated top-to-bottom on
//! whitespace-stripped text. For the single-label taxonomy the first rule
//! with any keyword hit wins, so rule order encodes priority: award
//! keywords are checked before contract keywords, otherwise a headline
//! like "タイトル獲得で年俸アップ" would land in 契約更改.
//!
//! The multi-label variant collects every matching rule's label plus any
//! personnel name appearing verbatim in the text.

use newsdesk_core::sentinel;

/// One classification rule: a label and the keywords that trigger it
#[derive(Debug, Clone)]
pub struct ClassifyRule {
    pub label: String,
    pub keywords: Vec<String>,
}

impl ClassifyRule {
    pub fn new(label: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            label: label.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn matches(&self, text: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| !keyword.is_empty() && text.contains(keyword.as_str()))
    }
}

/// Ordered first-match-wins classifier
#[derive(Debug, Clone)]
pub struct RuleClassifier {
    rules: Vec<ClassifyRule>,
    /// Names tagged verbatim in the multi-label variant
    personnel: Vec<String>,
}

impl RuleClassifier {
    pub fn new(rules: Vec<ClassifyRule>, personnel: Vec<String>) -> Self {
        Self { rules, personnel }
    }

    /// Assign a single topic label; no match falls back to the
    /// uncategorized sentinel.
    pub fn classify(&self, headline: &str, summary: Option<&str>) -> String {
        let text = strip_whitespace(headline, summary);
        self.rules
            .iter()
            .find(|rule| rule.matches(&text))
            .map(|rule| rule.label.clone())
            .unwrap_or_else(|| sentinel::UNCATEGORIZED.to_string())
    }

    /// Collect all matching labels plus personnel names found verbatim,
    /// deduplicated in rule order. Never empty.
    pub fn tags(&self, headline: &str, summary: Option<&str>) -> Vec<String> {
        let text = strip_whitespace(headline, summary);

        let mut tags: Vec<String> = Vec::new();
        for rule in &self.rules {
            if rule.matches(&text) && !tags.contains(&rule.label) {
                tags.push(rule.label.clone());
            }
        }
        for name in &self.personnel {
            if !name.is_empty() && text.contains(name.as_str()) && !tags.contains(name) {
                tags.push(name.clone());
            }
        }

        if tags.is_empty() {
            tags.push(sentinel::UNCATEGORIZED.to_string());
        }
        tags
    }
}

impl Default for RuleClassifier {
    fn default() -> Self {
        Self::new(default_rules(), default_personnel())
    }
}

/// Default taxonomy, ordered by priority
pub fn default_rules() -> Vec<ClassifyRule> {
    vec![
        ClassifyRule::new(
            "表彰",
            &["MVP", "ベストナイン", "ゴールデングラブ", "タイトル", "表彰", "受賞"],
        ),
        ClassifyRule::new("ドラフト", &["ドラフト", "指名"]),
        ClassifyRule::new(
            "移籍・FA",
            &["移籍", "FA", "トレード", "戦力外", "退団", "入団", "ポスティング"],
        ),
        ClassifyRule::new("契約更改", &["契約更改", "契約", "年俸", "更改", "サイン"]),
        ClassifyRule::new(
            "試合",
            &["試合", "勝利", "敗戦", "先発", "完封", "本塁打", "打点", "登板", "サヨナラ"],
        ),
    ]
}

/// Default personnel names for the multi-label variant
pub fn default_personnel() -> Vec<String> {
    ["岸田", "中嶋", "宮城", "山下舜平大", "杉本", "森友哉", "頓宮"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Concatenate headline and summary with all whitespace removed, so
/// keyword matching is insensitive to feed formatting.
fn strip_whitespace(headline: &str, summary: Option<&str>) -> String {
    headline
        .chars()
        .chain(summary.unwrap_or("").chars())
        .filter(|c| !c.is_whitespace())
        .collect()
}
