//! Runtime instance definitions.
//!
//! An [`Instance`] is the read-only description of one upstream Alertmanager.
//! It is built once from configuration and shared by the poller for that
//! instance; nothing in the pull pipeline mutates it.

use std::{sync::Arc, time::Duration};

/// Path segment under the listen prefix where instances are proxied.
pub const PROXY_PATH: &str = "proxy/alertmanager";

/// One configured upstream alerting server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    /// Display name, unique across the configuration.
    pub name: Arc<str>,
    /// Base URI the API paths are joined onto.
    pub uri: String,
    /// Upper bound for every request issued against this instance.
    pub timeout: Duration,
    /// When set, browsers reach the instance through the local proxy path.
    pub proxy: bool,
    /// Listen prefix of the serving layer, used for proxied public URIs.
    pub listen_prefix: String,
}

impl Instance {
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, uri: impl Into<String>, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            timeout,
            proxy: false,
            listen_prefix: "/".to_string(),
        }
    }

    #[must_use]
    pub fn with_proxy(mut self, listen_prefix: impl Into<String>) -> Self {
        self.proxy = true;
        self.listen_prefix = listen_prefix.into();
        self
    }

    /// URI users should be sent to for this instance.
    ///
    /// The real URI unless proxying is enabled, in which case it is
    /// `<listen_prefix>/proxy/alertmanager/<name>`.
    #[must_use]
    pub fn public_uri(&self) -> String {
        if !self.proxy {
            return self.uri.clone();
        }
        let prefix = self.listen_prefix.trim_end_matches('/');
        let prefix =
            if prefix.starts_with('/') { prefix.to_string() } else { format!("/{prefix}") };
        format!("{}/{PROXY_PATH}/{}", prefix.trim_end_matches('/'), self.name)
    }
}
