use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;

use crate::domain::ScanReport;
use crate::scanner::{ReportCache, StoreError};

/// Single-slot report storage. Each scan replaces the previous report
/// wholesale; last writer wins.
#[derive(Clone)]
pub struct SqliteReportCache {
    pool: SqlitePool,
}

impl SqliteReportCache {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportCache for SqliteReportCache {
    async fn get(&self) -> Result<Option<ScanReport>, StoreError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT payload FROM report_cache WHERE slot = 1")
                .fetch_optional(&self.pool)
                .await?;
        match row {
            Some((payload,)) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, report: &ScanReport) -> Result<(), StoreError> {
        let payload = serde_json::to_string(report)?;
        sqlx::query(
            "INSERT OR REPLACE INTO report_cache (slot, payload, scanned_at) VALUES (1, ?1, ?2)",
        )
        .bind(payload)
        .bind(report.scanned_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
