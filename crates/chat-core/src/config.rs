//! Client Configuration
//!
//! Where documents are fetched from and how long opened object URLs live.

use std::time::Duration;

/// Document client configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the model server, used as given without validation
    pub base_url: String,

    /// Seconds an opened object URL stays valid before it is revoked
    pub release_after_secs: u64,

    /// Request timeout in seconds (native targets only)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            release_after_secs: 60,
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Build from `CHAT_API_BASE_URL` / `CHAT_OBJECT_URL_TTL_SECS`.
    ///
    /// Runtime environment wins; WASM builds only see the values baked in at
    /// compile time.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = std::env::var("CHAT_API_BASE_URL")
            .ok()
            .or_else(|| option_env!("CHAT_API_BASE_URL").map(String::from))
            .unwrap_or(defaults.base_url);
        let release_after_secs = std::env::var("CHAT_OBJECT_URL_TTL_SECS")
            .ok()
            .or_else(|| option_env!("CHAT_OBJECT_URL_TTL_SECS").map(String::from))
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.release_after_secs);

        Self {
            base_url,
            release_after_secs,
            ..defaults
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_release_after(mut self, secs: u64) -> Self {
        self.release_after_secs = secs;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn release_after(&self) -> Duration {
        Duration::from_secs(self.release_after_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
