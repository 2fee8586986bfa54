//! Settings commands.
//!
//! Settings are persisted with tauri-plugin-store. `EXPENSE_API_URL`
//! overrides the stored backend address on every load.

use crate::db::{currency_cache, pool::DbPool};
use crate::error::AppError;
use crate::models::AppSettings;
use tauri::{AppHandle, State};
use tauri_plugin_store::StoreExt;

/// Store filename for settings.
const SETTINGS_STORE: &str = "settings.json";

/// Key for the settings object in the store.
const SETTINGS_KEY: &str = "app_settings";

/// Load settings from the store, using defaults if missing or unreadable.
pub fn load_settings(app: &AppHandle) -> Result<AppSettings, AppError> {
    let store = app
        .store(SETTINGS_STORE)
        .map_err(|e| AppError::internal(format!("Failed to open settings store: {}", e)))?;

    let settings = match store.get(SETTINGS_KEY) {
        Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable settings: {}", e);
            AppSettings::default()
        }),
        None => AppSettings::default(),
    };

    Ok(settings.with_env_overrides())
}

fn save_settings(app: &AppHandle, settings: &AppSettings) -> Result<(), AppError> {
    let store = app
        .store(SETTINGS_STORE)
        .map_err(|e| AppError::internal(format!("Failed to open settings store: {}", e)))?;

    store.set(SETTINGS_KEY, serde_json::to_value(settings)?);
    store
        .save()
        .map_err(|e| AppError::internal(format!("Failed to save settings: {}", e)))
}

#[tauri::command]
pub async fn get_settings(app: AppHandle) -> Result<AppSettings, AppError> {
    load_settings(&app)
}

/// Replace the settings. Takes effect at the next sign-in.
///
/// A new currency catalog source drops the cached catalog.
#[tauri::command]
pub async fn update_settings(
    app: AppHandle,
    pool: State<'_, DbPool>,
    settings: AppSettings,
) -> Result<(), AppError> {
    if settings.api.base_url.trim().is_empty() {
        return Err(AppError::invalid_input_field(
            "API URL is required",
            "api.base_url",
        ));
    }
    if settings.currency.cache_ttl_secs < 0 {
        return Err(AppError::invalid_input_field(
            "Cache lifetime cannot be negative",
            "currency.cache_ttl_secs",
        ));
    }

    let previous = load_settings(&app)?;
    save_settings(&app, &settings)?;
    if settings.invalidates_catalog(&previous) {
        currency_cache::clear(pool.inner()).await?;
        log::info!("Currency source changed, cached catalog dropped");
    }
    log::info!("Settings updated (API {})", settings.api.base_url);
    Ok(())
}
