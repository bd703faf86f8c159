use thiserror::Error;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
    pub timezone: String,
    pub scheduler: SchedulerConfig,
    pub scan: ScanSettings,
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
    pub data_dir: String,
    pub db_filename: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub cron_spec: String,
}

/// Tuning knobs for one scan run. Loaded once at the boundary and passed into
/// the scanner; the engine never reads configuration from global state.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    /// Trailing window, in days, over which comment activity is analyzed.
    pub lookback_days: u32,
    pub spam_threshold: i64,
    pub pending_threshold: i64,
    pub spam_ratio_threshold: f64,
    pub link_threshold: u32,
    /// When enabled, keyword/link heuristics run as set-based queries.
    pub light_mode: bool,
    pub batch_size: u32,
    /// Candidate-volume cutoff above which heuristics are skipped.
    /// Zero disables the cutoff.
    pub heuristics_cutoff: i64,
    /// Trimmed, lowercased, deduplicated keyword terms.
    pub keywords: Vec<String>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            lookback_days: 14,
            spam_threshold: 25,
            pending_threshold: 20,
            spam_ratio_threshold: 0.40,
            link_threshold: 2,
            light_mode: true,
            batch_size: 50,
            heuristics_cutoff: 500,
            keywords: Vec::new(),
        }
    }
}

impl ScanSettings {
    /// Forces every field back into its valid range. Out-of-range values are
    /// a boundary concern: they are corrected here, never surfaced to the
    /// scan itself.
    pub fn clamped(mut self) -> Self {
        self.lookback_days = clamp_min(self.lookback_days, 1, "lookback_days");
        self.spam_threshold = clamp_min(self.spam_threshold, 1, "spam_threshold");
        self.pending_threshold = clamp_min(self.pending_threshold, 0, "pending_threshold");
        self.link_threshold = clamp_min(self.link_threshold, 1, "link_threshold");
        self.batch_size = clamp_min(self.batch_size, 5, "batch_size");
        self.heuristics_cutoff = clamp_min(self.heuristics_cutoff, 0, "heuristics_cutoff");
        if !(0.0..=1.0).contains(&self.spam_ratio_threshold) {
            let clamped = self.spam_ratio_threshold.clamp(0.0, 1.0);
            tracing::warn!(
                target: "config",
                value = self.spam_ratio_threshold,
                clamped,
                "spam_ratio_threshold out of range; clamping"
            );
            self.spam_ratio_threshold = if clamped.is_nan() { 0.0 } else { clamped };
        }
        self
    }
}

fn clamp_min<T: PartialOrd + Copy + std::fmt::Display>(value: T, min: T, field: &str) -> T {
    if value < min {
        tracing::warn!(target: "config", %value, %min, field, "setting below minimum; clamping");
        min
    } else {
        value
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_corrects_out_of_range_settings() {
        let settings = ScanSettings {
            lookback_days: 0,
            spam_threshold: 0,
            pending_threshold: -3,
            spam_ratio_threshold: 1.7,
            link_threshold: 0,
            light_mode: true,
            batch_size: 1,
            heuristics_cutoff: -1,
            keywords: Vec::new(),
        }
        .clamped();

        assert_eq!(settings.lookback_days, 1);
        assert_eq!(settings.spam_threshold, 1);
        assert_eq!(settings.pending_threshold, 0);
        assert_eq!(settings.spam_ratio_threshold, 1.0);
        assert_eq!(settings.link_threshold, 1);
        assert_eq!(settings.batch_size, 5);
        assert_eq!(settings.heuristics_cutoff, 0);
    }

    #[test]
    fn clamped_keeps_valid_settings_untouched() {
        let settings = ScanSettings::default().clamped();
        assert_eq!(settings.lookback_days, 14);
        assert_eq!(settings.batch_size, 50);
        assert!((settings.spam_ratio_threshold - 0.40).abs() < f64::EPSILON);
    }
}
