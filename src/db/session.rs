//! Cached profile of the signed-in user.

use crate::db::pool::DbPool;
use crate::error::AppError;
use crate::models::{SessionProfile, User};

/// Store the signed-in user, replacing any previous profile.
///
/// The company currency is reset; it is looked up again for the new user.
pub async fn save_profile(pool: &DbPool, user: &User, now: i64) -> Result<(), AppError> {
    let user_json = serde_json::to_string(user)?;

    sqlx::query(
        r#"
        INSERT INTO session_profile (id, user_json, company_currency, cached_at)
        VALUES (1, ?, NULL, ?)
        ON CONFLICT (id) DO UPDATE SET
            user_json = excluded.user_json,
            company_currency = NULL,
            cached_at = excluded.cached_at
        "#,
    )
    .bind(&user_json)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Remember the company currency for the current profile.
pub async fn set_company_currency(pool: &DbPool, currency: &str) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE session_profile SET company_currency = ? WHERE id = 1")
        .bind(currency)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("SessionProfile"));
    }

    Ok(())
}

/// Load the current profile, if someone is signed in.
pub async fn load_profile(pool: &DbPool) -> Result<Option<SessionProfile>, AppError> {
    let row: Option<(String, Option<String>, i64)> = sqlx::query_as(
        "SELECT user_json, company_currency, cached_at FROM session_profile WHERE id = 1",
    )
    .fetch_optional(pool)
    .await?;

    match row {
        Some((user_json, company_currency, cached_at)) => Ok(Some(SessionProfile {
            user: serde_json::from_str(&user_json)?,
            company_currency,
            cached_at,
        })),
        None => Ok(None),
    }
}

/// Forget the signed-in user.
pub async fn clear_profile(pool: &DbPool) -> Result<(), AppError> {
    sqlx::query("DELETE FROM session_profile")
        .execute(pool)
        .await?;

    Ok(())
}
