//! Currency catalog command.

use crate::commands::settings::load_settings;
use crate::db::pool::DbPool;
use crate::error::AppError;
use crate::models::Currency;
use crate::services::currency_catalog;
use tauri::{AppHandle, State};

/// Currencies for the signup and expense forms, served from the local cache
/// while it is fresh.
#[tauri::command]
pub async fn list_currencies(
    app: AppHandle,
    pool: State<'_, DbPool>,
) -> Result<Vec<Currency>, AppError> {
    let settings = load_settings(&app)?;
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(settings.api.timeout_secs))
        .build()
        .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

    currency_catalog::load_currencies(pool.inner(), &client, &settings.currency).await
}
