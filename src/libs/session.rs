//! Completed work sessions and the store contract the engine writes them to.

use crate::libs::error::StoreError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One immutable, completed interval of tracked work time.
///
/// Built only through [`Session::complete`], which guarantees
/// `end_time >= start_time` and `duration_seconds == floor(end_time - start_time)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_seconds: i64,
}

impl Session {
    /// Closes an interval. A clock that stepped backwards yields a zero-length session.
    pub fn complete(start_time: NaiveDateTime, end_time: NaiveDateTime) -> Self {
        let end_time = end_time.max(start_time);
        Session {
            start_time,
            end_time,
            duration_seconds: (end_time - start_time).num_seconds(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.start_time.date()
    }
}

/// Append-only storage for completed sessions.
pub trait SessionStore: Send {
    /// Persists a completed session. Sessions are never updated afterwards.
    fn append(&mut self, start: NaiveDateTime, end: NaiveDateTime, duration_seconds: i64) -> Result<(), StoreError>;

    /// Sessions whose start falls on `date`, ordered by start.
    fn query_by_date(&mut self, date: NaiveDate) -> Result<Vec<Session>, StoreError>;

    /// Summed duration of the sessions that started on `date`.
    fn total_seconds_on(&mut self, date: NaiveDate) -> Result<u64, StoreError> {
        Ok(self
            .query_by_date(date)?
            .iter()
            .map(|s| s.duration_seconds.max(0) as u64)
            .sum())
    }

    /// The most recently appended session, if any.
    fn most_recent(&mut self) -> Result<Option<Session>, StoreError>;
}

impl<T: SessionStore + ?Sized> SessionStore for Box<T> {
    fn append(&mut self, start: NaiveDateTime, end: NaiveDateTime, duration_seconds: i64) -> Result<(), StoreError> {
        (**self).append(start, end, duration_seconds)
    }

    fn query_by_date(&mut self, date: NaiveDate) -> Result<Vec<Session>, StoreError> {
        (**self).query_by_date(date)
    }

    fn total_seconds_on(&mut self, date: NaiveDate) -> Result<u64, StoreError> {
        (**self).total_seconds_on(date)
    }

    fn most_recent(&mut self) -> Result<Option<Session>, StoreError> {
        (**self).most_recent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 2).unwrap().and_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn duration_is_whole_seconds() {
        let start = at(9, 0, 0);
        let end = at(9, 0, 59) + Duration::milliseconds(999);
        let session = Session::complete(start, end);
        assert_eq!(session.duration_seconds, 59);
    }

    #[test]
    fn backwards_clock_gives_empty_session() {
        let session = Session::complete(at(10, 0, 0), at(9, 59, 0));
        assert_eq!(session.end_time, session.start_time);
        assert_eq!(session.duration_seconds, 0);
    }
}
