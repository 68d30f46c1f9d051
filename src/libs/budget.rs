//! Daily work-time budget.
//!
//! The tracker snapshots how much time was already stored for today when a
//! session starts (`baseline_seconds_today`) and, on every tick, adds the
//! elapsed time of the running session to it. Crossing the limit raises one
//! notification and pushes the limit 30 minutes further, so the user is
//! reminded again for every further half hour of work. A total that is
//! several steps past the limit (say, after a resume from sleep) fires once
//! per tick until the limit has caught up.
//!
//! The baseline is deliberately not refreshed while a session runs.

/// Amount the limit moves forward after every breach.
pub const ESCALATION_STEP_SECONDS: u64 = 1800;

/// Notification payload: cumulative time today at the moment of the breach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdExceeded {
    pub hours: u64,
    pub minutes: u64,
}

impl ThresholdExceeded {
    fn from_total(total_seconds: u64) -> Self {
        ThresholdExceeded {
            hours: total_seconds / 3600,
            minutes: (total_seconds % 3600) / 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetState {
    pub baseline_seconds_today: u64,
    pub limit_seconds: u64,
    /// Set while a breach is being reported; cleared again once the limit has moved.
    pub exceeded_in_current_run: bool,
}

impl BudgetState {
    pub fn new(baseline_seconds_today: u64, limit_seconds: u64) -> Self {
        BudgetState {
            baseline_seconds_today,
            limit_seconds,
            exceeded_in_current_run: false,
        }
    }

    /// Prepares the budget for a new run on the same day. An escalated limit is kept.
    pub fn rebase(&mut self, baseline_seconds_today: u64) {
        self.baseline_seconds_today = baseline_seconds_today;
        self.exceeded_in_current_run = false;
    }

    pub fn total_today(&self, elapsed_seconds: u64) -> u64 {
        self.baseline_seconds_today + elapsed_seconds
    }

    /// Applies one tick and returns the notification to raise, if any.
    pub fn tick(&mut self, elapsed_seconds: u64) -> Option<ThresholdExceeded> {
        let total = self.total_today(elapsed_seconds);
        if total < self.limit_seconds || self.exceeded_in_current_run {
            return None;
        }

        self.exceeded_in_current_run = true;
        let notice = ThresholdExceeded::from_total(total);
        self.limit_seconds += ESCALATION_STEP_SECONDS;
        self.exceeded_in_current_run = false;

        Some(notice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_limit_is_silent() {
        let mut budget = BudgetState::new(0, 3600);
        assert_eq!(budget.tick(3599), None);
        assert_eq!(budget.limit_seconds, 3600);
    }

    #[test]
    fn crossing_exactly_at_limit_fires_once() {
        let mut budget = BudgetState::new(0, 10);
        assert_eq!(budget.tick(9), None);
        assert_eq!(budget.tick(10), Some(ThresholdExceeded { hours: 0, minutes: 0 }));
        assert_eq!(budget.limit_seconds, 1810);
        assert!(!budget.exceeded_in_current_run);

        assert_eq!(budget.tick(11), None);
        assert_eq!(budget.tick(1809), None);
        assert!(budget.tick(1810).is_some());
        assert_eq!(budget.limit_seconds, 3610);
    }

    #[test]
    fn baseline_counts_towards_total() {
        let mut budget = BudgetState::new(7 * 3600 + 50 * 60, 8 * 3600);
        assert_eq!(budget.tick(599), None);
        assert_eq!(budget.tick(600), Some(ThresholdExceeded { hours: 8, minutes: 0 }));
    }

    #[test]
    fn far_past_limit_fires_once_per_step_until_caught_up() {
        let mut budget = BudgetState::new(0, 8 * 3600);
        assert_eq!(budget.tick(8 * 3600 - 1), None);

        let fired: Vec<_> = (0..6).filter_map(|_| budget.tick(10 * 3600)).collect();

        assert_eq!(fired.len(), 5);
        assert!(fired.iter().all(|n| *n == ThresholdExceeded { hours: 10, minutes: 0 }));
        assert_eq!(budget.limit_seconds, 10 * 3600 + 30 * 60);
        assert!(!budget.exceeded_in_current_run);
        assert_eq!(budget.tick(10 * 3600 + 1), None);
    }

    #[test]
    fn baseline_past_limit_fires_on_consecutive_ticks() {
        let mut budget = BudgetState::new(8 * 3600 + 45 * 60, 8 * 3600);
        assert_eq!(budget.tick(0), Some(ThresholdExceeded { hours: 8, minutes: 45 }));
        assert_eq!(budget.tick(1), Some(ThresholdExceeded { hours: 8, minutes: 45 }));
        assert_eq!(budget.limit_seconds, 9 * 3600);
        assert_eq!(budget.tick(2), None);
    }

    #[test]
    fn rebase_keeps_escalated_limit() {
        let mut budget = BudgetState::new(0, 10);
        budget.tick(10);
        budget.rebase(600);
        assert_eq!(budget.limit_seconds, 1810);
        assert!(!budget.exceeded_in_current_run);
        assert_eq!(budget.baseline_seconds_today, 600);
        assert_eq!(budget.tick(1209), None);
        assert!(budget.tick(1210).is_some());
    }
}
