//! Notifications raised by the tracking engine.
//!
//! The engine only decides *that* something should be shown; rendering is
//! the caller's business. The CLI uses [`ConsoleNotifier`], tests record the
//! calls.

use crate::libs::error::TrackerError;
use crate::libs::messages::Message;
use crate::libs::tracker::TrackerState;
use crate::{msg_info, msg_success, msg_warning};

pub trait NotificationSink: Send {
    /// Cumulative time today crossed the (possibly escalated) daily limit.
    fn on_threshold_exceeded(&mut self, hours: u64, minutes: u64);

    /// The first start of the process happened in a new month.
    fn on_month_changed(&mut self);

    fn on_state_changed(&mut self, state: TrackerState);

    /// A persistence or configuration problem the user should know about.
    fn on_warning(&mut self, error: &TrackerError);
}

/// Prints notifications through the application message macros.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl NotificationSink for ConsoleNotifier {
    fn on_threshold_exceeded(&mut self, hours: u64, minutes: u64) {
        msg_warning!(Message::DailyLimitExceeded { hours, minutes }, true);
    }

    fn on_month_changed(&mut self) {
        msg_info!(Message::MonthChanged, true);
    }

    fn on_state_changed(&mut self, state: TrackerState) {
        match state {
            TrackerState::Running => msg_success!(Message::SessionStarted),
            TrackerState::Stopped => msg_info!(Message::SessionStopped),
        }
    }

    fn on_warning(&mut self, error: &TrackerError) {
        msg_warning!(Message::TrackerWarning(error.to_string()));
    }
}
