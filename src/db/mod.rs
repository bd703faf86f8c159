use std::{path::Path, str::FromStr, time::Duration};

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

pub mod directory;
pub mod report_cache;
pub mod tenant;

pub use directory::SqliteTenantDirectory;
pub use report_cache::SqliteReportCache;
pub use tenant::TenantDb;

pub async fn init_pool(db_path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5))
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    bootstrap_schema(&pool).await?;
    Ok(pool)
}

/// Network-level tables. Per-tenant tables are provisioned when a tenant is
/// created and are owned by the tenants themselves; the scanner only reads
/// them.
pub async fn bootstrap_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sites (
            site_id INTEGER PRIMARY KEY,
            domain TEXT NOT NULL,
            path TEXT NOT NULL DEFAULT '/',
            registered DATETIME DEFAULT CURRENT_TIMESTAMP,
            deleted INTEGER NOT NULL DEFAULT 0,
            archived INTEGER NOT NULL DEFAULT 0,
            spam INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS report_cache (
            slot INTEGER PRIMARY KEY CHECK (slot = 1),
            payload TEXT NOT NULL,
            scanned_at DATETIME NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
