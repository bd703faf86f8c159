//! Verdict computation. A plain OR over the signal thresholds, no weighting.

use crate::config::ScanSettings;

/// Fixed floor for keyword hits; deliberately not configurable.
pub const KEYWORD_FLAG_FLOOR: i64 = 10;
/// Fixed floor for link-heavy hits; deliberately not configurable.
pub const LINK_FLAG_FLOOR: i64 = 10;

#[derive(Debug, Clone, Copy, Default)]
pub struct TenantSignals {
    pub spam_count: i64,
    pub pending_count: i64,
    pub spam_ratio: f64,
    pub keyword_hits: i64,
    pub link_heavy_hits: i64,
}

/// spam / (spam + approved), with the denominator floored at 1 so a tenant
/// with no activity scores 0 instead of dividing by zero.
pub fn spam_ratio(spam_count: i64, approved_count: i64) -> f64 {
    let denominator = (spam_count + approved_count).max(1);
    spam_count as f64 / denominator as f64
}

pub fn score(signals: &TenantSignals, settings: &ScanSettings) -> bool {
    signals.spam_count >= settings.spam_threshold
        || signals.pending_count >= settings.pending_threshold
        || signals.spam_ratio >= settings.spam_ratio_threshold
        || signals.keyword_hits >= KEYWORD_FLAG_FLOOR
        || signals.link_heavy_hits >= LINK_FLAG_FLOOR
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ScanSettings {
        ScanSettings {
            lookback_days: 14,
            spam_threshold: 25,
            pending_threshold: 20,
            spam_ratio_threshold: 0.40,
            ..ScanSettings::default()
        }
    }

    #[test]
    fn ratio_denominator_floors_at_one() {
        assert_eq!(spam_ratio(0, 0), 0.0);
        assert_eq!(spam_ratio(3, 0), 1.0);
        assert!((spam_ratio(30, 10) - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn ratio_stays_within_unit_interval() {
        for (spam, approved) in [(0, 0), (0, 50), (1, 0), (17, 3), (1000, 1)] {
            let ratio = spam_ratio(spam, approved);
            assert!((0.0..=1.0).contains(&ratio), "ratio {ratio} out of range");
        }
    }

    #[test]
    fn quiet_tenant_is_not_flagged() {
        let signals = TenantSignals {
            spam_count: 2,
            pending_count: 1,
            spam_ratio: 0.1,
            ..TenantSignals::default()
        };
        assert!(!score(&signals, &settings()));
    }

    #[test]
    fn spam_count_and_ratio_both_exceeding_flags() {
        // 30 spam / (30 + 10) approved in window.
        let signals = TenantSignals {
            spam_count: 30,
            pending_count: 5,
            spam_ratio: spam_ratio(30, 10),
            ..TenantSignals::default()
        };
        assert!((signals.spam_ratio - 0.75).abs() < f64::EPSILON);
        assert!(score(&signals, &settings()));
    }

    #[test]
    fn any_single_signal_is_enough() {
        let base = TenantSignals::default();
        assert!(score(
            &TenantSignals {
                pending_count: 20,
                ..base
            },
            &settings()
        ));
        assert!(score(
            &TenantSignals {
                keyword_hits: 10,
                ..base
            },
            &settings()
        ));
        assert!(score(
            &TenantSignals {
                link_heavy_hits: 11,
                ..base
            },
            &settings()
        ));
        assert!(!score(
            &TenantSignals {
                keyword_hits: 9,
                link_heavy_hits: 9,
                ..base
            },
            &settings()
        ));
    }
}
