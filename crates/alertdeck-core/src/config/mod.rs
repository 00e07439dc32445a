//! Application configuration with layered loading.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//!
//! 1. **Compiled defaults**: Hardcoded in struct `Default` implementations
//! 2. **Config file**: TOML file specified by `ALERTDECK_CONFIG` env var
//! 3. **Environment variables**: `ALERTDECK__*` env vars override specific fields
//!
//! # Configuration Sections
//!
//! - [`InstanceConfig`]: upstream Alertmanager instances
//! - [`ListenConfig`]: listen prefix used for proxied public URIs
//! - [`ColorsConfig`]: label keys that get colors
//! - [`JiraRuleConfig`]: issue-tracker detection rules
//! - [`HttpConfig`]: shared HTTP client limits
//! - [`LoggingConfig`]: Log level and format
//!
//! # Example
//!
//! ```toml
//! [[instances]]
//! name = "production"
//! uri = "http://alertmanager.example.com:9093"
//! timeout_seconds = 20
//! proxy = true
//!
//! [colors]
//! labels = ["cluster", "@receiver"]
//!
//! [[jira]]
//! regex = "OPS-[0-9]+"
//! uri = "https://jira.example.com"
//! ```

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::Path, sync::Arc, time::Duration};

use crate::{
    transform::{JiraDetector, JiraRule, LabelColorizer, Transforms},
    types::Instance,
    upstream::HttpClientConfig,
};

/// One upstream Alertmanager instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceConfig {
    /// Display name, must be unique.
    pub name: String,

    /// Base URI of the Alertmanager API. Must start with `http` or `https`.
    pub uri: String,

    /// Timeout for every request to this instance. Defaults to `40`.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Whether users reach this instance through the local proxy. Defaults to `false`.
    #[serde(default)]
    pub proxy: bool,
}

fn default_timeout_seconds() -> u64 {
    40
}

/// Settings of the serving layer that affect published data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenConfig {
    /// URL path prefix everything is served under. Defaults to `/`.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_prefix() -> String {
    "/".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColorsConfig {
    /// Label keys that receive colors. `@receiver` colors alert receivers.
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Issue-tracker detection rule applied to silence comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraRuleConfig {
    pub regex: String,
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Maximum number of in-flight upstream requests. Defaults to `64`.
    #[serde(default = "default_concurrent_limit")]
    pub concurrent_limit: usize,

    /// How long a request may wait for a free slot. Defaults to `5000`.
    #[serde(default = "default_permit_timeout_ms")]
    pub permit_timeout_ms: u64,
}

fn default_concurrent_limit() -> usize {
    64
}

fn default_permit_timeout_ms() -> u64 {
    5_000
}

/// Application logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "trace", "debug", "info", "warn", "error"). Defaults to `"info"`.
    pub level: String,

    /// Output format: `"json"` or `"pretty"`. Defaults to `"pretty"`.
    pub format: String,
}

/// Root application configuration.
///
/// Loaded with the `ALERTDECK` prefix for environment overrides using `__` as
/// a separator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Upstream instances. At least one is required.
    #[serde(default)]
    pub instances: Vec<InstanceConfig>,

    #[serde(default)]
    pub listen: ListenConfig,

    #[serde(default)]
    pub colors: ColorsConfig,

    #[serde(default)]
    pub jira: Vec<JiraRuleConfig>,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self { prefix: default_prefix() }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            concurrent_limit: default_concurrent_limit(),
            permit_timeout_ms: default_permit_timeout_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file with environment variable overrides.
    ///
    /// Use `__` as a separator for nested fields (e.g.,
    /// `ALERTDECK__LOGGING__FORMAT=json`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed, or deserialized.
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_builder = Config::builder()
            .set_default("listen.prefix", "/")?
            .set_default("http.concurrent_limit", 64)?
            .set_default("http.permit_timeout_ms", 5_000)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name(&config_path.as_ref().to_string_lossy()).required(false))
            .add_source(Environment::with_prefix("ALERTDECK").separator("__"))
            .build()?;

        config_builder.try_deserialize()
    }

    /// Loads configuration from `config/config.toml`.
    ///
    /// The config file path can be overridden using the `ALERTDECK_CONFIG`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration cannot be loaded or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("ALERTDECK_CONFIG").unwrap_or_else(|_| "config/config.toml".to_string());
        Self::from_file(&config_path)
    }

    /// Validates the configuration for correctness and consistency.
    ///
    /// Checks include:
    /// - At least one instance is configured and names are unique
    /// - All instance URIs are `http(s)` URLs and timeouts are non-zero
    /// - All issue-tracker regexes compile
    /// - Logging format is either `"json"` or `"pretty"`
    ///
    /// # Errors
    ///
    /// Returns a descriptive error string if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.instances.is_empty() {
            return Err("No Alertmanager instances configured".to_string());
        }

        let mut names = HashSet::new();
        for instance in &self.instances {
            if instance.name.is_empty() {
                return Err(format!("Empty name for instance with URI: {}", instance.uri));
            }
            if !names.insert(instance.name.as_str()) {
                return Err(format!("Duplicate instance name: {}", instance.name));
            }
            if instance.uri.is_empty() {
                return Err(format!("Empty URI for instance: {}", instance.name));
            }
            match url::Url::parse(&instance.uri) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                _ => {
                    return Err(format!(
                        "Invalid URI for instance {}: {}",
                        instance.name, instance.uri
                    ));
                }
            }
            if instance.timeout_seconds == 0 {
                return Err(format!(
                    "Timeout must be greater than 0 for instance: {}",
                    instance.name
                ));
            }
        }

        for rule in &self.jira {
            if let Err(e) = regex::Regex::new(&rule.regex) {
                return Err(format!("Invalid JIRA regex '{}': {e}", rule.regex));
            }
        }

        if self.http.concurrent_limit == 0 {
            return Err("HTTP concurrent limit must be greater than 0".to_string());
        }

        if !["json", "pretty"].contains(&self.logging.format.as_str()) {
            return Err("Logging format must be 'json' or 'pretty'".to_string());
        }

        Ok(())
    }

    /// Converts instance definitions into runtime [`Instance`] values.
    #[must_use]
    pub fn instances(&self) -> Vec<Instance> {
        self.instances
            .iter()
            .map(|c| {
                let instance = Instance::new(
                    Arc::<str>::from(c.name.as_str()),
                    c.uri.clone(),
                    Duration::from_secs(c.timeout_seconds),
                );
                if c.proxy {
                    instance.with_proxy(self.listen.prefix.clone())
                } else {
                    instance
                }
            })
            .collect()
    }

    /// Builds the transforms shared by all pollers.
    ///
    /// # Errors
    ///
    /// Returns [`regex::Error`] if an issue-tracker regex does not compile.
    pub fn transforms(&self) -> Result<Transforms, regex::Error> {
        let rules = self
            .jira
            .iter()
            .map(|rule| JiraRule::new(&rule.regex, rule.uri.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Transforms::new(
            LabelColorizer::new(self.colors.labels.iter().cloned()),
            JiraDetector::new(rules),
        ))
    }

    #[must_use]
    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            concurrent_limit: self.http.concurrent_limit,
            permit_timeout_ms: self.http.permit_timeout_ms,
        }
    }
}
