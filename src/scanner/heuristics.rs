//! Gate for the expensive pattern-matching heuristics. Plain counts always
//! run; keyword/link scans only run in light mode and only while the
//! candidate volume stays under the configured cutoff.

/// `cutoff == 0` means no cutoff.
pub fn should_run_heuristics(light_mode: bool, cutoff: i64, candidate_count: i64) -> bool {
    light_mode && (cutoff == 0 || candidate_count < cutoff)
}

/// Whether the link-marker predicate should require the "http" marker twice.
/// Below a threshold of two links a single occurrence already qualifies.
pub fn link_marker_doubled(link_threshold: u32) -> bool {
    link_threshold >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_light_mode_never_runs() {
        assert!(!should_run_heuristics(false, 0, 0));
        assert!(!should_run_heuristics(false, 100, 5));
    }

    #[test]
    fn zero_cutoff_always_runs_in_light_mode() {
        assert!(should_run_heuristics(true, 0, 0));
        assert!(should_run_heuristics(true, 0, 1_000_000));
    }

    #[test]
    fn candidate_volume_at_or_over_cutoff_skips() {
        assert!(should_run_heuristics(true, 100, 99));
        assert!(!should_run_heuristics(true, 100, 100));
        assert!(!should_run_heuristics(true, 100, 150));
    }

    #[test]
    fn link_marker_mode_follows_threshold() {
        assert!(!link_marker_doubled(1));
        assert!(link_marker_doubled(2));
        assert!(link_marker_doubled(7));
    }
}
