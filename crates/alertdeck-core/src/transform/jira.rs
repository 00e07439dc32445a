use regex::Regex;

use crate::models::Silence;

/// One issue-tracker detection rule.
#[derive(Debug, Clone)]
pub struct JiraRule {
    regex: Regex,
    uri: String,
}

impl JiraRule {
    /// # Errors
    ///
    /// Returns [`regex::Error`] if `pattern` does not compile.
    pub fn new(pattern: &str, uri: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self { regex: Regex::new(pattern)?, uri: uri.into() })
    }

    fn detect(&self, text: &str) -> Option<(String, String)> {
        let id = self.regex.find(text)?.as_str().to_string();
        let url = format!("{}/browse/{id}", self.uri.trim_end_matches('/'));
        Some((id, url))
    }
}

/// Extracts issue IDs from silence comments using an ordered rule list.
#[derive(Debug, Clone, Default)]
pub struct JiraDetector {
    rules: Vec<JiraRule>,
}

impl JiraDetector {
    #[must_use]
    pub fn new(rules: Vec<JiraRule>) -> Self {
        Self { rules }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns `(id, url)` for the first rule matching `text`.
    #[must_use]
    pub fn detect(&self, text: &str) -> Option<(String, String)> {
        self.rules.iter().find_map(|rule| rule.detect(text))
    }

    /// Fills the issue fields of `silence` from its comment.
    pub fn apply(&self, silence: &mut Silence) {
        let (id, url) = self.detect(&silence.comment).unzip();
        silence.jira_id = id;
        silence.jira_url = url;
    }
}
