use crate::db::pool::DbPool;
use crate::error::AppError;

/// A cached payload and when it was fetched (Unix).
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CacheEntry {
    pub payload: String,
    pub fetched_at: i64,
}

impl CacheEntry {
    /// Whether the entry is younger than `ttl_secs` at `now`.
    pub fn is_fresh(&self, now: i64, ttl_secs: i64) -> bool {
        now.saturating_sub(self.fetched_at) < ttl_secs
    }
}

/// Get the entry stored under `key`, if any.
pub async fn get_entry(pool: &DbPool, key: &str) -> Result<Option<CacheEntry>, AppError> {
    let entry = sqlx::query_as::<_, CacheEntry>(
        "SELECT payload, fetched_at FROM currency_cache WHERE cache_key = ?",
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(entry)
}

/// Insert or replace the entry stored under `key`.
pub async fn put_entry(
    pool: &DbPool,
    key: &str,
    payload: &str,
    fetched_at: i64,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO currency_cache (cache_key, payload, fetched_at)
        VALUES (?, ?, ?)
        ON CONFLICT (cache_key) DO UPDATE SET payload = excluded.payload, fetched_at = excluded.fetched_at
        "#,
    )
    .bind(key)
    .bind(payload)
    .bind(fetched_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Drop every cached entry.
pub async fn clear(pool: &DbPool) -> Result<(), AppError> {
    sqlx::query("DELETE FROM currency_cache")
        .execute(pool)
        .await?;

    Ok(())
}
