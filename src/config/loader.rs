use std::env;

use super::env::{
    AppConfig, ConfigError, DirectoryConfig, LoggingConfig, ScanSettings, SchedulerConfig,
};
use crate::scanner::keywords::parse_keyword_list;

const DEFAULT_KEYWORDS: &str = "casino, viagra, cialis, payday loan, forex signals, betting tips";

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let directories = DirectoryConfig {
            logs_dir: env::var("LOGS_DIR").unwrap_or_else(|_| "logs".to_string()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            db_filename: env::var("DB_FILENAME").unwrap_or_else(|_| "network.db".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        let timezone = env::var("SCAN_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());

        let scheduler = SchedulerConfig {
            cron_spec: env::var("SCAN_CRON").unwrap_or_else(|_| "0 0 3 * * *".to_string()),
        };

        let defaults = ScanSettings::default();
        let scan = ScanSettings {
            lookback_days: parse_var("SCAN_LOOKBACK_DAYS", defaults.lookback_days)?,
            spam_threshold: parse_var("SCAN_SPAM_THRESHOLD", defaults.spam_threshold)?,
            pending_threshold: parse_var("SCAN_PENDING_THRESHOLD", defaults.pending_threshold)?,
            spam_ratio_threshold: parse_var(
                "SCAN_SPAM_RATIO_THRESHOLD",
                defaults.spam_ratio_threshold,
            )?,
            link_threshold: parse_var("SCAN_LINK_THRESHOLD", defaults.link_threshold)?,
            light_mode: parse_var("SCAN_LIGHT_MODE", defaults.light_mode)?,
            batch_size: parse_var("SCAN_BATCH_SIZE", defaults.batch_size)?,
            heuristics_cutoff: parse_var("SCAN_HEURISTICS_CUTOFF", defaults.heuristics_cutoff)?,
            keywords: parse_keyword_list(
                &env::var("SCAN_KEYWORDS").unwrap_or_else(|_| DEFAULT_KEYWORDS.to_string()),
            ),
        }
        .clamped();

        Ok(Self {
            directories,
            logging,
            timezone,
            scheduler,
            scan,
        })
    }
}

fn parse_var<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|err| ConfigError::Invalid(key, err.to_string())),
        Err(_) => Ok(default),
    }
}
