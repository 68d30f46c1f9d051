#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use worklog::libs::config::TrackerConfig;
use worklog::libs::error::{StoreError, TrackerError};
use worklog::libs::idle::IdleSource;
use worklog::libs::lock::{SessionEvent, SessionEventSource};
use worklog::libs::notify::NotificationSink;
use worklog::libs::session::{Session, SessionStore};
use worklog::libs::tracker::TrackerState;

pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, min, sec)
        .unwrap()
}

pub fn config_with_limit(limit: u64) -> TrackerConfig {
    TrackerConfig {
        daily_limit_seconds: Some(limit),
        ..TrackerConfig::default()
    }
}

/// In-memory store with switchable failures.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub sessions: Vec<Session>,
    pub fail_appends: bool,
    pub fail_reads: bool,
}

impl MemoryStore {
    pub fn with_sessions(sessions: Vec<Session>) -> Self {
        MemoryStore {
            sessions,
            ..MemoryStore::default()
        }
    }

    fn unavailable() -> StoreError {
        StoreError::Unavailable("store offline".to_string())
    }
}

impl SessionStore for MemoryStore {
    fn append(&mut self, start: NaiveDateTime, end: NaiveDateTime, duration_seconds: i64) -> Result<(), StoreError> {
        if self.fail_appends {
            return Err(Self::unavailable());
        }
        self.sessions.push(Session {
            start_time: start,
            end_time: end,
            duration_seconds,
        });
        Ok(())
    }

    fn query_by_date(&mut self, date: NaiveDate) -> Result<Vec<Session>, StoreError> {
        if self.fail_reads {
            return Err(Self::unavailable());
        }
        Ok(self.sessions.iter().filter(|s| s.date() == date).cloned().collect())
    }

    fn most_recent(&mut self) -> Result<Option<Session>, StoreError> {
        if self.fail_reads {
            return Err(Self::unavailable());
        }
        Ok(self.sessions.last().cloned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Threshold(u64, u64),
    MonthChanged,
    State(TrackerState),
    Warning(String),
}

/// Sink that records every notification in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub notices: Vec<Notice>,
}

impl RecordingSink {
    pub fn thresholds(&self) -> Vec<(u64, u64)> {
        self.notices
            .iter()
            .filter_map(|n| match n {
                Notice::Threshold(h, m) => Some((*h, *m)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, notice: &Notice) -> usize {
        self.notices.iter().filter(|n| *n == notice).count()
    }

    pub fn warnings(&self) -> usize {
        self.notices.iter().filter(|n| matches!(n, Notice::Warning(_))).count()
    }
}

impl NotificationSink for RecordingSink {
    fn on_threshold_exceeded(&mut self, hours: u64, minutes: u64) {
        self.notices.push(Notice::Threshold(hours, minutes));
    }

    fn on_month_changed(&mut self) {
        self.notices.push(Notice::MonthChanged);
    }

    fn on_state_changed(&mut self, state: TrackerState) {
        self.notices.push(Notice::State(state));
    }

    fn on_warning(&mut self, error: &TrackerError) {
        self.notices.push(Notice::Warning(error.to_string()));
    }
}

/// Idle source replaying a fixed list of samples, then repeating the last one.
pub struct ScriptedIdle {
    samples: VecDeque<Result<f64, ()>>,
    last: f64,
}

impl ScriptedIdle {
    pub fn new(samples: Vec<Result<f64, ()>>) -> Self {
        ScriptedIdle {
            samples: samples.into(),
            last: 0.0,
        }
    }
}

impl IdleSource for ScriptedIdle {
    fn idle_seconds(&mut self) -> Result<f64, TrackerError> {
        match self.samples.pop_front() {
            Some(Ok(seconds)) => {
                self.last = seconds;
                Ok(seconds)
            }
            Some(Err(())) => Err(TrackerError::SignalSource("idle query failed".to_string())),
            None => Ok(self.last),
        }
    }
}

/// Session notification source fed from the test through a shared queue.
#[derive(Clone, Default)]
pub struct ScriptedLock {
    pub pending: Arc<Mutex<VecDeque<SessionEvent>>>,
    pub fail_register: bool,
    pub unregistered: Arc<AtomicBool>,
}

impl ScriptedLock {
    pub fn push(&self, event: SessionEvent) {
        self.pending.lock().push_back(event);
    }

    pub fn was_unregistered(&self) -> bool {
        self.unregistered.load(Ordering::SeqCst)
    }
}

impl SessionEventSource for ScriptedLock {
    fn register(&mut self) -> Result<(), TrackerError> {
        if self.fail_register {
            return Err(TrackerError::SignalSource("registration refused".to_string()));
        }
        Ok(())
    }

    fn next_event(&mut self, timeout: Duration) -> Result<Option<SessionEvent>, TrackerError> {
        if let Some(event) = self.pending.lock().pop_front() {
            return Ok(Some(event));
        }
        std::thread::sleep(timeout.min(Duration::from_millis(10)));
        Ok(None)
    }

    fn unregister(&mut self) {
        self.unregistered.store(true, Ordering::SeqCst);
    }
}
