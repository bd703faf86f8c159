use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use sqlx::sqlite::SqlitePool;

use crate::domain::TenantMeta;
use crate::scanner::{
    CommentCountQuery, CommentStore, ContentPredicate, RoleConfigStore, StoreError, TenantContext,
    TenantSession,
};

const ROLE_OPTION: &str = "user_roles";

/// Access to tenant-scoped tables. Each tenant owns a `tenant_{id}_options`
/// and a `tenant_{id}_comments` table; a missing table surfaces as a query
/// error at the tenant boundary, never as a crash.
pub struct TenantDb {
    pool: SqlitePool,
    /// Currently entered tenant. The context switch is not reentrant.
    active: Mutex<Option<i64>>,
    /// Tenant metadata resolved while inside a context. Cleared between
    /// batches so memory stays flat on large networks.
    meta_cache: Mutex<HashMap<i64, (String, String)>>,
}

fn options_table(tenant_id: i64) -> String {
    format!("tenant_{tenant_id}_options")
}

fn comments_table(tenant_id: i64) -> String {
    format!("tenant_{tenant_id}_comments")
}

impl TenantDb {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            active: Mutex::new(None),
            meta_cache: Mutex::new(HashMap::new()),
        }
    }

    async fn load_metadata(&self, tenant: &TenantMeta) -> Result<(String, String), StoreError> {
        if let Some(cached) = self.meta_cache.lock().get(&tenant.id) {
            return Ok(cached.clone());
        }

        let rows: Vec<(String, String)> = sqlx::query_as(&format!(
            "SELECT option_name, option_value FROM {} WHERE option_name IN ('blogname', 'home')",
            options_table(tenant.id)
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut display_name = None;
        let mut home_url = None;
        for (name, value) in rows {
            match name.as_str() {
                "blogname" => display_name = Some(value),
                "home" => home_url = Some(value),
                _ => {}
            }
        }
        let resolved = (
            display_name.unwrap_or_else(|| tenant.placeholder_name()),
            home_url.unwrap_or_else(|| tenant.reconstructed_home_url()),
        );
        self.meta_cache.lock().insert(tenant.id, resolved.clone());
        Ok(resolved)
    }
}

#[async_trait]
impl RoleConfigStore for TenantDb {
    async fn read_raw(&self, tenant_id: i64) -> Result<Option<String>, StoreError> {
        let row: Option<(String,)> = sqlx::query_as(&format!(
            "SELECT option_value FROM {} WHERE option_name = ?1",
            options_table(tenant_id)
        ))
        .bind(ROLE_OPTION)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(value,)| value))
    }
}

#[async_trait]
impl TenantContext for TenantDb {
    async fn enter(&self, tenant: &TenantMeta) -> Result<TenantSession, StoreError> {
        {
            let mut active = self.active.lock();
            if let Some(current) = *active {
                return Err(StoreError::Unavailable(format!(
                    "tenant context {current} is still active"
                )));
            }
            *active = Some(tenant.id);
        }

        match self.load_metadata(tenant).await {
            Ok((display_name, home_url)) => Ok(TenantSession {
                tenant_id: tenant.id,
                display_name,
                home_url,
            }),
            Err(err) => {
                *self.active.lock() = None;
                Err(err)
            }
        }
    }

    async fn exit(&self, session: TenantSession) {
        let mut active = self.active.lock();
        debug_assert_eq!(*active, Some(session.tenant_id));
        *active = None;
    }

    fn flush_caches(&self) {
        self.meta_cache.lock().clear();
    }
}

#[async_trait]
impl CommentStore for TenantDb {
    async fn count(
        &self,
        session: &TenantSession,
        query: CommentCountQuery<'_>,
    ) -> Result<i64, StoreError> {
        let placeholders = vec!["?"; query.statuses.len()].join(", ");
        let mut sql = format!(
            "SELECT COUNT(*) FROM {} WHERE status IN ({placeholders}) AND created_at >= ?",
            comments_table(session.tenant_id)
        );

        match &query.content {
            Some(ContentPredicate::Keywords(pattern)) => {
                if pattern.is_empty() {
                    return Ok(0);
                }
                let alternation = pattern
                    .terms()
                    .iter()
                    .map(|_| "lower(content) LIKE ? ESCAPE '\\'")
                    .collect::<Vec<_>>()
                    .join(" OR ");
                sql.push_str(&format!(" AND ({alternation})"));
            }
            Some(ContentPredicate::LinkMarker { doubled }) => {
                // Marker-substring approximation, not an exact link count.
                if *doubled {
                    sql.push_str(" AND lower(content) LIKE '%http%http%'");
                } else {
                    sql.push_str(" AND lower(content) LIKE '%http%'");
                }
            }
            None => {}
        }

        let mut count_query = sqlx::query_scalar::<_, i64>(&sql);
        for status in query.statuses {
            count_query = count_query.bind(status.as_str());
        }
        count_query = count_query.bind(query.since);
        if let Some(ContentPredicate::Keywords(pattern)) = &query.content {
            for like in pattern.like_patterns() {
                count_query = count_query.bind(like);
            }
        }

        Ok(count_query.fetch_one(&self.pool).await?)
    }
}
