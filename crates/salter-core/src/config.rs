//! Client configuration.

use std::time::Duration;

/// Base URL of the exchange API.
pub const DEFAULT_BASE_URL: &str = "https://www.nepalstock.com.np";

/// The upstream rejects non-browser user agents.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/133.0.0.0 Safari/537.36";

/// Tunables for the client, the token lifecycle, and the response cache.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Per-request timeout budget in milliseconds.
    pub timeout_ms: u64,
    pub cache_enabled: bool,
    /// Store-wide TTL applied when an endpoint does not override it.
    pub cache_ttl: Duration,
    pub cache_max_entries: usize,
    /// Validity window assumed for a derived token; the seed endpoint does
    /// not report an expiry.
    pub token_validity: Duration,
    /// Tokens are treated as expired this long before their nominal expiry
    /// to avoid losing in-flight requests to a boundary race.
    pub token_safety_margin: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            user_agent: String::from(DEFAULT_USER_AGENT),
            timeout_ms: 10_000,
            cache_enabled: true,
            cache_ttl: Duration::from_secs(30),
            cache_max_entries: 256,
            token_validity: Duration::from_secs(45 * 60),
            token_safety_margin: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_cache_max_entries(mut self, max_entries: usize) -> Self {
        self.cache_max_entries = max_entries;
        self
    }

    pub fn with_token_validity(mut self, validity: Duration) -> Self {
        self.token_validity = validity;
        self
    }

    pub fn with_token_safety_margin(mut self, margin: Duration) -> Self {
        self.token_safety_margin = margin;
        self
    }
}
