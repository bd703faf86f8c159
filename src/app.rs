use std::{sync::Arc, time::Duration};

use anyhow::Result;
use chrono_tz::Tz;
use tokio::time::timeout;

use crate::{
    cli,
    config::{AppConfig, ScanSettings},
    db::{self, SqliteReportCache, SqliteTenantDirectory, TenantDb},
    domain::ScanReport,
    infrastructure::{directories::ResolvedPaths, shutdown::Shutdown},
    scanner::{NetworkScanner, ReportCache},
    tasks::scheduler::{configure_scan_job, ScanCallback},
};

/// The one scan entrypoint shared by the cron trigger, the manual trigger
/// and the CLI. Runs are serialized so a cron firing cannot overlap a manual
/// rescan.
pub struct ScanRunner {
    scanner: NetworkScanner,
    cache: Arc<dyn ReportCache>,
    settings: ScanSettings,
    run_lock: tokio::sync::Mutex<()>,
}

impl ScanRunner {
    pub fn new(
        scanner: NetworkScanner,
        cache: Arc<dyn ReportCache>,
        settings: ScanSettings,
    ) -> Self {
        Self {
            scanner,
            cache,
            settings,
            run_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub async fn run_scan(&self) -> Result<ScanReport> {
        let _serialized = self.run_lock.lock().await;
        let report = self.scanner.run(&self.settings).await?;
        self.cache.put(&report).await?;
        Ok(report)
    }
}

pub struct ScanApp {
    config: Arc<AppConfig>,
    runner: Arc<ScanRunner>,
    cache: Arc<SqliteReportCache>,
}

impl ScanApp {
    pub async fn initialize(config: AppConfig, paths: ResolvedPaths) -> Result<Self> {
        let pool = db::init_pool(&paths.db_path).await?;
        let directory = Arc::new(SqliteTenantDirectory::new(pool.clone()));
        let tenant_db = Arc::new(TenantDb::new(pool.clone()));
        let cache = Arc::new(SqliteReportCache::new(pool));

        let scanner = NetworkScanner::new(
            directory,
            tenant_db.clone(),
            tenant_db.clone(),
            tenant_db,
        );
        let runner = Arc::new(ScanRunner::new(
            scanner,
            cache.clone(),
            config.scan.clone(),
        ));

        Ok(Self {
            config: Arc::new(config),
            runner,
            cache,
        })
    }

    pub async fn scan_once(&self, json: bool) -> Result<()> {
        let report = self.runner.run_scan().await?;
        self.print_report(&report, json)
    }

    pub async fn show_report(&self, json: bool) -> Result<()> {
        match self.cache.get().await? {
            Some(report) => self.print_report(&report, json),
            None => {
                println!("no cached report yet; run `netspam scan` first");
                Ok(())
            }
        }
    }

    pub async fn run_daemon(self, shutdown: Shutdown) -> Result<()> {
        let runner = self.runner.clone();
        let callback: ScanCallback = Arc::new(move || {
            let runner = runner.clone();
            tokio::spawn(async move {
                if let Err(err) = runner.run_scan().await {
                    tracing::error!(target: "scanner", error = %err, "scheduled scan failed");
                }
            });
        });
        let mut scheduler = configure_scan_job(&self.config.scheduler.cron_spec, callback).await?;

        let mut listener = shutdown.subscribe();
        listener.notified().await;
        tracing::info!("shutdown signal received");

        match timeout(Duration::from_secs(5), scheduler.shutdown()).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::error!(target: "scheduler", ?err, "scheduler shutdown failed"),
            Err(_) => tracing::warn!(target: "scheduler", "scheduler did not stop in time"),
        }
        Ok(())
    }

    fn print_report(&self, report: &ScanReport, json: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(report)?);
        } else {
            print!("{}", cli::render_table(report, &self.timezone()));
        }
        Ok(())
    }

    fn timezone(&self) -> Tz {
        self.config.timezone.parse().unwrap_or(chrono_tz::UTC)
    }
}
