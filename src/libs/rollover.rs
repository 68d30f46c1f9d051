//! One-shot month rollover check.
//!
//! At the first session start of the process the month of the last stored
//! session is compared with the current month. A difference means last
//! month's sessions are complete and ready to be exported.

use crate::libs::error::StoreError;
use crate::libs::session::SessionStore;
use chrono::{Datelike, NaiveDateTime};
use tracing::debug;

#[derive(Debug, Default)]
pub struct RolloverChecker {
    checked: bool,
}

impl RolloverChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a check has read the store successfully. Never reset.
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Returns `Ok(true)` when the month changed since the last stored session.
    ///
    /// A failed read leaves the checker armed so the next start retries.
    pub fn check<S: SessionStore + ?Sized>(&mut self, store: &mut S, now: NaiveDateTime) -> Result<bool, StoreError> {
        if self.checked {
            return Ok(false);
        }

        let last = store.most_recent()?;
        self.checked = true;

        let Some(last) = last else {
            debug!("rollover check: no stored sessions");
            return Ok(false);
        };

        let changed = (last.start_time.year(), last.start_time.month()) != (now.year(), now.month());
        debug!(last = %last.start_time, %now, changed, "rollover check");
        Ok(changed)
    }
}
