use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;

use crate::domain::TenantMeta;
use crate::scanner::{StoreError, TenantDirectory};

/// Tenant enumeration over the network `sites` table. Soft-deleted, archived
/// and marked-as-spam tenants are never handed to the scanner.
#[derive(Clone)]
pub struct SqliteTenantDirectory {
    pool: SqlitePool,
}

impl SqliteTenantDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const ACTIVE_FILTER: &str = "deleted = 0 AND archived = 0 AND spam = 0";

#[async_trait]
impl TenantDirectory for SqliteTenantDirectory {
    async fn count_active(&self) -> Result<i64, StoreError> {
        let count: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM sites WHERE {ACTIVE_FILTER}"))
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn page(&self, offset: i64, limit: i64) -> Result<Vec<TenantMeta>, StoreError> {
        let rows: Vec<(i64, String, String)> = sqlx::query_as(&format!(
            "SELECT site_id, domain, path FROM sites WHERE {ACTIVE_FILTER} \
             ORDER BY site_id LIMIT ?1 OFFSET ?2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, domain, path)| TenantMeta { id, domain, path })
            .collect())
    }
}
