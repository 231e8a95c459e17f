//! Relevance filter for loosely-matched search results
//!
//! The search endpoint returns anything that mentions the query terms
//! somewhere in the article, so headlines are re-checked against the
//! tracked team's name and a hand-tuned alias list (manager and player
//! names, the short-form team tag). Best-effort precision, not recall.

/// Headline filter for the tracked team
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    /// Team name and its variants
    terms: Vec<String>,
    /// Personnel names and short-form tags accepted in place of the name
    aliases: Vec<String>,
}

impl RelevanceFilter {
    pub fn new(terms: Vec<String>, aliases: Vec<String>) -> Self {
        Self { terms, aliases }
    }

    /// Accept iff the headline mentions the team or any alias.
    pub fn is_relevant(&self, headline: &str) -> bool {
        self.terms
            .iter()
            .chain(self.aliases.iter())
            .any(|term| !term.is_empty() && headline.contains(term.as_str()))
    }
}

impl Default for RelevanceFilter {
    fn default() -> Self {
        Self::new(
            vec!["オリックス".to_string(), "バファローズ".to_string()],
            vec!["岸田".to_string(), "中嶋".to_string(), "Bs".to_string()],
        )
    }
}
