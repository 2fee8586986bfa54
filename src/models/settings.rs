//! Application settings.

use serde::{Deserialize, Serialize};

/// Default backend address used by local deployments.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

/// Public countries API the currency catalog is built from.
pub const DEFAULT_COUNTRIES_API_URL: &str = "https://restcountries.com/v3.1/all?fields=name,currencies";

/// Environment variable overriding the backend address.
pub const API_URL_ENV: &str = "EXPENSE_API_URL";

/// Connection settings for the expense backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Currency catalog settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencySettings {
    pub catalog_url: String,
    /// How long a fetched catalog is served from the local cache.
    pub cache_ttl_secs: i64,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_COUNTRIES_API_URL.to_string(),
            cache_ttl_secs: 24 * 60 * 60,
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub api: ApiSettings,
    pub currency: CurrencySettings,
}

impl AppSettings {
    /// Apply `EXPENSE_API_URL` when it is set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            let url = url.trim();
            if !url.is_empty() {
                log::debug!("Using {} from {}", url, API_URL_ENV);
                self.api.base_url = url.to_string();
            }
        }
        self
    }

    /// Whether switching from `previous` makes the cached currency catalog
    /// belong to another source.
    pub fn invalidates_catalog(&self, previous: &AppSettings) -> bool {
        self.currency.catalog_url.trim() != previous.currency.catalog_url.trim()
    }
}
