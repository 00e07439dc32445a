use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Alert, Autocomplete};

/// Collects filter hints across alert groups.
///
/// Hints are keyed by value, so the same hint produced by several groups is
/// stored once with the union of its tokens.
#[derive(Debug, Default)]
pub struct AutocompleteBuilder {
    hints: BTreeMap<String, BTreeSet<String>>,
}

impl AutocompleteBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_alerts<'a>(&mut self, alerts: impl IntoIterator<Item = &'a Alert>) {
        for alert in alerts {
            self.add_alert(alert);
        }
    }

    pub fn add_alert(&mut self, alert: &Alert) {
        self.hint("@state", "=", alert.state.as_str());
        self.hint("@silenced", "=", if alert.is_silenced() { "true" } else { "false" });
        self.hint("@inhibited", "=", if alert.inhibited { "true" } else { "false" });
        if let Some(receiver) = &alert.receiver {
            self.hint("@receiver", "=", receiver);
        }
        for (key, value) in &alert.labels {
            self.hint(key, "=", value);
            self.hint(key, "!=", value);
        }
    }

    fn hint(&mut self, key: &str, operator: &str, value: &str) {
        let tokens = self.hints.entry(format!("{key}{operator}{value}")).or_default();
        tokens.insert(format!("{key}{operator}{value}"));
        tokens.insert(key.to_string());
        for part in value.split_whitespace() {
            tokens.insert(part.to_string());
        }
    }

    /// Returns the hints sorted by value.
    #[must_use]
    pub fn build(self) -> Vec<Autocomplete> {
        self.hints
            .into_iter()
            .map(|(value, tokens)| Autocomplete { value, tokens: tokens.into_iter().collect() })
            .collect()
    }
}

/// Builds hints for a single alert list.
#[must_use]
pub fn build_autocomplete<'a>(alerts: impl IntoIterator<Item = &'a Alert>) -> Vec<Autocomplete> {
    let mut builder = AutocompleteBuilder::new();
    builder.add_alerts(alerts);
    builder.build()
}
