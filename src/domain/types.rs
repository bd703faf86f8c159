use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Directory-level identity of a tenant, available without entering its
/// context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantMeta {
    pub id: i64,
    pub domain: String,
    pub path: String,
}

impl TenantMeta {
    /// Public URL rebuilt from directory metadata, for rows produced when the
    /// tenant itself was unreachable.
    pub fn reconstructed_home_url(&self) -> String {
        format!("https://{}{}", self.domain, self.path)
    }

    pub fn placeholder_name(&self) -> String {
        format!("{}{}", self.domain, self.path.trim_end_matches('/'))
    }
}

/// Comment moderation status recognized by the aggregate queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStatus {
    Spam,
    Pending,
    Approved,
}

impl CommentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CommentStatus::Spam => "spam",
            CommentStatus::Pending => "pending",
            CommentStatus::Approved => "approved",
        }
    }
}

/// One row of the scan report. Every enumerated tenant produces exactly one,
/// whether it was audited or skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantResult {
    pub tenant_id: i64,
    pub display_name: String,
    pub home_url: String,
    pub spam_count: i64,
    pub pending_count: i64,
    pub spam_ratio: f64,
    pub keyword_hits: i64,
    pub link_heavy_hits: i64,
    pub flagged: bool,
    #[serde(default)]
    pub error: String,
}

impl TenantResult {
    /// Row for a tenant that could not be audited. Counts stay zero and the
    /// tenant is never flagged.
    pub fn error_row(meta: &TenantMeta, error: String) -> Self {
        Self {
            tenant_id: meta.id,
            display_name: meta.placeholder_name(),
            home_url: meta.reconstructed_home_url(),
            spam_count: 0,
            pending_count: 0,
            spam_ratio: 0.0,
            keyword_hits: 0,
            link_heavy_hits: 0,
            flagged: false,
            error,
        }
    }

    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }
}

/// Outcome of a full network scan. Overwrites the previous cached report
/// wholesale; no history is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub scanned_at: DateTime<Utc>,
    pub rows: Vec<TenantResult>,
}

impl ScanReport {
    pub fn flagged_count(&self) -> usize {
        self.rows.iter().filter(|row| row.flagged).count()
    }

    pub fn error_count(&self) -> usize {
        self.rows.iter().filter(|row| row.has_error()).count()
    }
}
