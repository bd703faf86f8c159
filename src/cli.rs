//! Command-line surface. Tenant-level errors are report data, not process
//! failures; every subcommand exits 0 once it completes.

use chrono_tz::Tz;
use clap::{Parser, Subcommand};

use crate::domain::ScanReport;

#[derive(Debug, Parser)]
#[command(name = "netspam", about = "Comment-spam auditor for site networks", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a full network scan now and print the report.
    Scan {
        /// Print the report as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Print the most recently cached report without scanning.
    Report {
        /// Print the report as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Stay resident and scan on the configured cron schedule.
    Daemon,
}

const NAME_WIDTH: usize = 28;

pub fn render_table(report: &ScanReport, tz: &Tz) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>6}  {:<NAME_WIDTH$}  {:>6}  {:>7}  {:>5}  {:>5}  {:>5}  {:<4}  ERROR\n",
        "SITE", "NAME", "SPAM", "PENDING", "RATIO", "KW", "LINKS", "FLAG"
    ));
    for row in &report.rows {
        out.push_str(&format!(
            "{:>6}  {:<NAME_WIDTH$}  {:>6}  {:>7}  {:>5.2}  {:>5}  {:>5}  {:<4}  {}\n",
            row.tenant_id,
            truncate(&row.display_name, NAME_WIDTH),
            row.spam_count,
            row.pending_count,
            row.spam_ratio,
            row.keyword_hits,
            row.link_heavy_hits,
            if row.flagged { "YES" } else { "-" },
            row.error
        ));
    }
    out.push_str(&format!(
        "\n{} tenants, {} flagged, {} errored; scanned at {}\n",
        report.rows.len(),
        report.flagged_count(),
        report.error_count(),
        report
            .scanned_at
            .with_timezone(tz)
            .format("%Y-%m-%d %H:%M:%S %Z")
    ));
    out
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let head: String = value.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{TenantMeta, TenantResult};

    #[test]
    fn table_lists_every_row_and_the_summary() {
        let meta = TenantMeta {
            id: 7,
            domain: "blog.example.net".to_string(),
            path: "/".to_string(),
        };
        let report = ScanReport {
            scanned_at: Utc::now(),
            rows: vec![
                TenantResult {
                    tenant_id: 3,
                    display_name: "Gardening Weekly".to_string(),
                    home_url: "https://garden.example.net".to_string(),
                    spam_count: 42,
                    pending_count: 7,
                    spam_ratio: 0.84,
                    keyword_hits: 12,
                    link_heavy_hits: 3,
                    flagged: true,
                    error: String::new(),
                },
                TenantResult::error_row(&meta, "corrupt tenant config".to_string()),
            ],
        };
        let table = render_table(&report, &chrono_tz::UTC);
        assert!(table.contains("Gardening Weekly"));
        assert!(table.contains("YES"));
        assert!(table.contains("corrupt tenant config"));
        assert!(table.contains("2 tenants, 1 flagged, 1 errored"));
    }

    #[test]
    fn long_names_are_truncated() {
        assert_eq!(truncate("short", 10), "short");
        let long = "a".repeat(40);
        let cut = truncate(&long, 10);
        assert_eq!(cut.chars().count(), 10);
        assert!(cut.ends_with('…'));
    }
}
