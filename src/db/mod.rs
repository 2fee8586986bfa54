//! Database layer for local SQLite storage.
//!
//! The local database only holds client-side state:
//! - the signed-in user's profile (`session`)
//! - the time-boxed currency catalog cache (`currency_cache`)
//!
//! Everything authoritative lives on the expense backend.

pub mod currency_cache;
pub mod pool;
pub mod session;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Database-related errors.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Ordered schema migrations, applied once each.
const MIGRATIONS: &[(&str, &str)] = &[(
    "0001_initial_schema",
    include_str!("migrations/0001_initial_schema.sql"),
)];

/// Get the path to the SQLite database file inside the app data directory.
pub fn get_db_path(app_data_dir: &Path) -> PathBuf {
    app_data_dir.join("expense-desk.db")
}

/// Create the database file if needed and bring its schema up to date.
pub async fn initialize(db_path: &Path) -> Result<pool::DbPool, DbError> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            DbError::Migration(format!("Failed to create database directory: {}", e))
        })?;
    }

    let pool = pool::create_pool(db_path).await?;
    run_migrations(&pool).await?;

    log::info!("Database ready at {}", db_path.display());
    Ok(pool)
}

/// Apply every migration not yet recorded in `_migrations`.
pub async fn run_migrations(pool: &pool::DbPool) -> Result<(), DbError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            applied_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    for &(name, sql) in MIGRATIONS {
        let applied: Option<(i64,)> = sqlx::query_as("SELECT id FROM _migrations WHERE name = ?")
            .bind(name)
            .fetch_optional(pool)
            .await?;

        if applied.is_some() {
            continue;
        }

        let mut tx = pool.begin().await?;
        sqlx::raw_sql(sql)
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::Migration(format!("{} failed: {}", name, e)))?;
        sqlx::query("INSERT INTO _migrations (name) VALUES (?)")
            .bind(name)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        log::info!("Applied migration {}", name);
    }

    Ok(())
}
