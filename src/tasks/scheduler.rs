use std::sync::Arc;

use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};

pub type ScanCallback = Arc<dyn Fn() + Send + Sync>;

/// Registers the daily scan job. The callback fires the same scan entrypoint
/// the manual and CLI triggers use.
pub async fn configure_scan_job(cron_spec: &str, callback: ScanCallback) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;
    let label = cron_spec.to_string();
    let job = Job::new_async(cron_spec, move |_id, _lock| {
        let cb = callback.clone();
        let cron_label = label.clone();
        Box::pin(async move {
            tracing::info!(target: "scheduler", cron = %cron_label, "scheduled scan triggered");
            cb();
        })
    })?;
    scheduler.add(job).await?;
    scheduler.start().await?;
    tracing::info!(target: "scheduler", cron = %cron_spec, "scan job registered");
    Ok(scheduler)
}
