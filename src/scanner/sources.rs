//! Collaborator contracts the scan engine depends on. Concrete SQLite-backed
//! implementations live in [`crate::db`]; tests substitute their own.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{CommentStatus, ScanReport, TenantMeta};
use crate::scanner::keywords::KeywordPattern;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("{0}")]
    Unavailable(String),
}

/// Live handle to a tenant's isolated data context, valid between a
/// successful `enter` and the matching `exit`.
#[derive(Debug)]
pub struct TenantSession {
    pub tenant_id: i64,
    pub display_name: String,
    pub home_url: String,
}

/// A set-based count over a tenant's comments: status filter, date lower
/// bound, optional content predicate. No comment bodies ever cross this
/// boundary.
pub struct CommentCountQuery<'a> {
    pub statuses: &'a [CommentStatus],
    pub since: DateTime<Utc>,
    pub content: Option<ContentPredicate<'a>>,
}

pub enum ContentPredicate<'a> {
    /// OR-alternation over the escaped keyword terms.
    Keywords(&'a KeywordPattern),
    /// The "http" marker-substring approximation for link-heavy comments.
    /// `doubled` requires the marker twice (chained substring checks), not an
    /// exact link count.
    LinkMarker { doubled: bool },
}

/// Enumerates active tenants, excluding deleted, archived and
/// marked-as-spam ones.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    async fn count_active(&self) -> Result<i64, StoreError>;
    async fn page(&self, offset: i64, limit: i64) -> Result<Vec<TenantMeta>, StoreError>;
}

/// Bulk access to a tenant's stored role configuration, readable without
/// entering the tenant context.
#[async_trait]
pub trait RoleConfigStore: Send + Sync {
    async fn read_raw(&self, tenant_id: i64) -> Result<Option<String>, StoreError>;
}

/// Switches into a tenant's isolated context. Only one context may be active
/// at a time; `exit` must be callable unconditionally after a successful
/// `enter`.
#[async_trait]
pub trait TenantContext: Send + Sync {
    async fn enter(&self, tenant: &TenantMeta) -> Result<TenantSession, StoreError>;
    async fn exit(&self, session: TenantSession);
    /// Drops any process-local cache of tenant-scoped data. Called between
    /// batches so state never accumulates across the network.
    fn flush_caches(&self);
}

/// Count queries scoped to the tenant of the given session.
#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn count(
        &self,
        session: &TenantSession,
        query: CommentCountQuery<'_>,
    ) -> Result<i64, StoreError>;
}

/// Single-slot report storage, last write wins.
#[async_trait]
pub trait ReportCache: Send + Sync {
    async fn get(&self) -> Result<Option<ScanReport>, StoreError>;
    async fn put(&self, report: &ScanReport) -> Result<(), StoreError>;
}
