//! Catalog of selectable currencies.
//!
//! Built from the public countries API and kept in the local database for a
//! configurable time, so the currency pickers don't hit the network on
//! every form.

use crate::db::currency_cache;
use crate::db::pool::DbPool;
use crate::error::AppError;
use crate::models::settings::CurrencySettings;
use crate::models::Currency;
use reqwest::Client;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;

/// Cache key of the catalog.
pub const CATALOG_CACHE_KEY: &str = "currencies";

#[derive(Debug, Deserialize)]
struct CountryEntry {
    #[serde(default)]
    currencies: Option<HashMap<String, CountryCurrency>>,
}

#[derive(Debug, Deserialize)]
struct CountryCurrency {
    name: String,
    #[serde(default)]
    symbol: Option<String>,
}

/// Extract the unique currencies from a countries payload, sorted by code.
///
/// Countries sharing a currency list it once; the first entry seen wins.
pub fn parse_countries(payload: &str) -> Result<Vec<Currency>, AppError> {
    let countries: Vec<CountryEntry> = serde_json::from_str(payload)?;
    let mut by_code: BTreeMap<String, Currency> = BTreeMap::new();

    for (code, currency) in countries
        .into_iter()
        .filter_map(|c| c.currencies)
        .flatten()
    {
        by_code.entry(code.clone()).or_insert_with(|| Currency {
            symbol: currency
                .symbol
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| code.clone()),
            name: currency.name,
            code,
        });
    }

    Ok(by_code.into_values().collect())
}

/// Download and parse the catalog.
pub async fn fetch_catalog(client: &Client, url: &str) -> Result<Vec<Currency>, AppError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::api_full(
            "Failed to fetch currencies",
            status.as_u16(),
            url,
        ));
    }

    let body = response.text().await?;
    parse_countries(&body)
}

/// Serve the catalog from cache, refreshing it through `fetch` once stale.
///
/// When the refresh fails a stale copy is still returned if one exists.
pub async fn resolve_catalog<F, Fut>(
    pool: &DbPool,
    ttl_secs: i64,
    now: i64,
    fetch: F,
) -> Result<Vec<Currency>, AppError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<Currency>, AppError>>,
{
    let cached = currency_cache::get_entry(pool, CATALOG_CACHE_KEY).await?;

    if let Some(entry) = &cached {
        if entry.is_fresh(now, ttl_secs) {
            return Ok(serde_json::from_str(&entry.payload)?);
        }
    }

    match fetch().await {
        Ok(currencies) => {
            let payload = serde_json::to_string(&currencies)?;
            currency_cache::put_entry(pool, CATALOG_CACHE_KEY, &payload, now).await?;
            Ok(currencies)
        }
        Err(e) => match cached {
            Some(entry) => {
                log::warn!("Currency refresh failed, serving cached catalog: {}", e);
                Ok(serde_json::from_str(&entry.payload)?)
            }
            None => Err(e),
        },
    }
}

/// Load the catalog using the configured source and cache lifetime.
pub async fn load_currencies(
    pool: &DbPool,
    client: &Client,
    settings: &CurrencySettings,
) -> Result<Vec<Currency>, AppError> {
    let now = chrono::Utc::now().timestamp();
    resolve_catalog(pool, settings.cache_ttl_secs, now, || {
        fetch_catalog(client, &settings.catalog_url)
    })
    .await
}
