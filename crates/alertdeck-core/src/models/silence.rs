use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Single label matcher of a silence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matcher {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub is_regex: bool,
}

/// Canonical silence record.
///
/// `id` is always a string, regardless of the schema generation it was decoded
/// from: legacy numeric IDs are stringified at decode time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Silence {
    pub id: String,
    pub matchers: Vec<Matcher>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub comment: String,
    /// Issue-tracker ID detected in `comment`, if any.
    #[serde(rename = "jiraID", skip_serializing_if = "Option::is_none")]
    pub jira_id: Option<String>,
    /// Link to the issue referenced by `jira_id`.
    #[serde(rename = "jiraURL", skip_serializing_if = "Option::is_none")]
    pub jira_url: Option<String>,
}

impl Silence {
    /// Returns `true` if the silence ended strictly before `at`.
    #[must_use]
    pub fn is_expired_at(&self, at: DateTime<Utc>) -> bool {
        self.ends_at < at
    }
}
