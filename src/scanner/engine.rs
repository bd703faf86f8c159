//! The network scan itself: batched tenant enumeration, guarded per-tenant
//! aggregation, scoring, and the final sort. A fault in one tenant never
//! escapes that tenant's boundary; it becomes an error row and the scan
//! moves on.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::config::ScanSettings;
use crate::domain::{CommentStatus, ScanReport, TenantMeta, TenantResult};
use crate::scanner::guard::{GuardVerdict, TenantGuard};
use crate::scanner::heuristics;
use crate::scanner::keywords::KeywordPattern;
use crate::scanner::scorer::{self, TenantSignals};
use crate::scanner::sources::{
    CommentCountQuery, CommentStore, ContentPredicate, RoleConfigStore, StoreError, TenantContext,
    TenantDirectory, TenantSession,
};

const CANDIDATE_STATUSES: &[CommentStatus] = &[CommentStatus::Spam, CommentStatus::Pending];

pub struct NetworkScanner {
    directory: Arc<dyn TenantDirectory>,
    guard: TenantGuard,
    context: Arc<dyn TenantContext>,
    comments: Arc<dyn CommentStore>,
}

impl NetworkScanner {
    pub fn new(
        directory: Arc<dyn TenantDirectory>,
        roles: Arc<dyn RoleConfigStore>,
        context: Arc<dyn TenantContext>,
        comments: Arc<dyn CommentStore>,
    ) -> Self {
        Self {
            directory,
            guard: TenantGuard::new(roles),
            context,
            comments,
        }
    }

    /// Visits every active tenant in fixed-size batches and returns the
    /// ranked report. Tenants are processed strictly sequentially; the
    /// context switch is not reentrant.
    pub async fn run(&self, settings: &ScanSettings) -> Result<ScanReport, StoreError> {
        let keywords = KeywordPattern::build(&settings.keywords);
        let since = Utc::now() - Duration::days(i64::from(settings.lookback_days));

        let total = self.directory.count_active().await?;
        let batch = i64::from(settings.batch_size.max(1));
        let pages = ((total + batch - 1) / batch).max(1);
        tracing::info!(target: "scanner", total, pages, batch, "network scan started");

        let mut rows = Vec::with_capacity(total.max(0) as usize);
        for page in 0..pages {
            let tenants = self.directory.page(page * batch, batch).await?;
            for tenant in &tenants {
                let row = self.audit_tenant(tenant, settings, &keywords, since).await;
                if row.has_error() {
                    tracing::warn!(
                        target: "scanner",
                        tenant_id = tenant.id,
                        error = %row.error,
                        "tenant skipped"
                    );
                }
                rows.push(row);
            }
            // Tenant-scoped state must not survive the batch.
            self.context.flush_caches();
            tracing::debug!(target: "scanner", page = page + 1, pages, "batch complete");
        }

        sort_rows(&mut rows);
        let report = ScanReport {
            scanned_at: Utc::now(),
            rows,
        };
        tracing::info!(
            target: "scanner",
            tenants = report.rows.len(),
            flagged = report.flagged_count(),
            errors = report.error_count(),
            "network scan finished"
        );
        Ok(report)
    }

    async fn audit_tenant(
        &self,
        tenant: &TenantMeta,
        settings: &ScanSettings,
        keywords: &KeywordPattern,
        since: DateTime<Utc>,
    ) -> TenantResult {
        match self.guard.inspect(tenant.id).await {
            GuardVerdict::Corrupt(reason) => {
                TenantResult::error_row(tenant, format!("corrupt tenant config: {reason}"))
            }
            GuardVerdict::Safe => match self.context.enter(tenant).await {
                Err(err) => {
                    TenantResult::error_row(tenant, format!("context switch failed: {err}"))
                }
                Ok(session) => {
                    let outcome = self
                        .collect_signals(&session, settings, keywords, since)
                        .await;
                    // Mandatory cleanup on every path that entered.
                    self.context.exit(session).await;
                    outcome.unwrap_or_else(|err| {
                        TenantResult::error_row(tenant, format!("aggregate query failed: {err}"))
                    })
                }
            },
        }
    }

    async fn collect_signals(
        &self,
        session: &TenantSession,
        settings: &ScanSettings,
        keywords: &KeywordPattern,
        since: DateTime<Utc>,
    ) -> Result<TenantResult, StoreError> {
        let spam_count = self
            .count(session, &[CommentStatus::Spam], since, None)
            .await?;
        let pending_count = self
            .count(session, &[CommentStatus::Pending], since, None)
            .await?;
        let approved_count = self
            .count(session, &[CommentStatus::Approved], since, None)
            .await?;
        let candidate_count = self.count(session, CANDIDATE_STATUSES, since, None).await?;

        let run_heuristics = heuristics::should_run_heuristics(
            settings.light_mode,
            settings.heuristics_cutoff,
            candidate_count,
        );

        let keyword_hits = if run_heuristics && !keywords.is_empty() {
            self.count(
                session,
                CANDIDATE_STATUSES,
                since,
                Some(ContentPredicate::Keywords(keywords)),
            )
            .await?
        } else {
            0
        };
        let link_heavy_hits = if run_heuristics {
            self.count(
                session,
                CANDIDATE_STATUSES,
                since,
                Some(ContentPredicate::LinkMarker {
                    doubled: heuristics::link_marker_doubled(settings.link_threshold),
                }),
            )
            .await?
        } else {
            0
        };

        let signals = TenantSignals {
            spam_count,
            pending_count,
            spam_ratio: scorer::spam_ratio(spam_count, approved_count),
            keyword_hits,
            link_heavy_hits,
        };
        Ok(TenantResult {
            tenant_id: session.tenant_id,
            display_name: session.display_name.clone(),
            home_url: session.home_url.clone(),
            spam_count,
            pending_count,
            spam_ratio: signals.spam_ratio,
            keyword_hits,
            link_heavy_hits,
            flagged: scorer::score(&signals, settings),
            error: String::new(),
        })
    }

    async fn count(
        &self,
        session: &TenantSession,
        statuses: &[CommentStatus],
        since: DateTime<Utc>,
        content: Option<ContentPredicate<'_>>,
    ) -> Result<i64, StoreError> {
        self.comments
            .count(
                session,
                CommentCountQuery {
                    statuses,
                    since,
                    content,
                },
            )
            .await
    }
}

/// Flagged tenants first, then spam count descending; stable otherwise.
pub fn sort_rows(rows: &mut [TenantResult]) {
    rows.sort_by(|a, b| {
        b.flagged
            .cmp(&a.flagged)
            .then(b.spam_count.cmp(&a.spam_count))
    });
}
