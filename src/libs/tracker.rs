//! Session state machine.
//!
//! [`Tracker`] is the single authority over whether a session is running.
//! It is owned by exactly one execution context, the event loop in
//! [`crate::libs::engine`], which feeds it one [`Event`] at a time. Because
//! nothing else ever touches it, none of its state is behind a lock.
//!
//! ## States
//!
//! ```text
//!              start / all pause reasons cleared
//!   ┌─────────┐ ──────────────────────────────▶ ┌─────────┐
//!   │ Stopped │                                  │ Running │
//!   └─────────┘ ◀────────────────────────────── └─────────┘
//!              stop / idle / lock / shutdown
//! ```
//!
//! Orthogonal to the state, [`PauseReasons`] remembers why the tracker
//! stopped on its own. An automatic resume only happens once *every* reason
//! has cleared, so unlocking the screen while the user is still away does not
//! restart the clock.

use crate::libs::budget::BudgetState;
use crate::libs::clock::Clock;
use crate::libs::config::TrackerConfig;
use crate::libs::error::TrackerError;
use crate::libs::event::{Command, Event, Flow, Signal};
use crate::libs::notify::NotificationSink;
use crate::libs::rollover::RolloverChecker;
use crate::libs::session::{Session, SessionStore};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Stopped,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PauseReason {
    Idle,
    Lock,
}

/// Set of reasons for which the tracker is currently auto-paused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PauseReasons(BTreeSet<PauseReason>);

impl PauseReasons {
    pub fn insert(&mut self, reason: PauseReason) -> bool {
        self.0.insert(reason)
    }

    pub fn remove(&mut self, reason: PauseReason) -> bool {
        self.0.remove(&reason)
    }

    pub fn contains(&self, reason: PauseReason) -> bool {
        self.0.contains(&reason)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

pub struct Tracker<S, C, N> {
    config: TrackerConfig,
    store: S,
    clock: C,
    sink: N,
    /// Start of the live, uncommitted session.
    run_start: Option<NaiveDateTime>,
    pause_reasons: PauseReasons,
    budget: Option<BudgetState>,
    budget_day: Option<NaiveDate>,
    rollover: RolloverChecker,
}

impl<S, C, N> Tracker<S, C, N>
where
    S: SessionStore,
    C: Clock,
    N: NotificationSink,
{
    pub fn new(config: TrackerConfig, store: S, clock: C, sink: N) -> Self {
        Tracker {
            config,
            store,
            clock,
            sink,
            run_start: None,
            pause_reasons: PauseReasons::default(),
            budget: None,
            budget_day: None,
            rollover: RolloverChecker::new(),
        }
    }

    pub fn state(&self) -> TrackerState {
        if self.run_start.is_some() {
            TrackerState::Running
        } else {
            TrackerState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.run_start.is_some()
    }

    pub fn run_start(&self) -> Option<NaiveDateTime> {
        self.run_start
    }

    pub fn pause_reasons(&self) -> &PauseReasons {
        &self.pause_reasons
    }

    pub fn budget(&self) -> Option<&BudgetState> {
        self.budget.as_ref()
    }

    pub fn rollover_checked(&self) -> bool {
        self.rollover.is_checked()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }

    /// Whole seconds since the running session started.
    pub fn elapsed_seconds(&self) -> Option<u64> {
        self.run_start
            .map(|start| (self.clock.now() - start).num_seconds().max(0) as u64)
    }

    /// Applies one queued event. Collaborator failures never escape this method.
    pub fn apply(&mut self, event: Event) -> Flow {
        match event {
            Event::Command(Command::Start) => {
                // An explicit start overrides any pending automatic resume.
                self.pause_reasons.clear();
                if let Err(error) = self.start_session() {
                    debug!(%error, "start command failed");
                }
            }
            Event::Command(Command::Stop) => {
                // After an explicit stop nothing may resume the session automatically.
                self.pause_reasons.clear();
                if let Err(error) = self.stop_session() {
                    debug!(%error, "stop command failed");
                }
            }
            Event::Command(Command::Shutdown) | Event::Signal(Signal::ShutdownRequested) => {
                self.shutdown();
                return Flow::Exit;
            }
            Event::Signal(Signal::IdlePauseRequested) => self.pause(PauseReason::Idle),
            Event::Signal(Signal::IdleResumeRequested) => self.resume(PauseReason::Idle),
            Event::Signal(Signal::LockPauseRequested) => self.pause(PauseReason::Lock),
            Event::Signal(Signal::LockResumeRequested) => self.resume(PauseReason::Lock),
            Event::Tick => self.tick(),
        }
        Flow::Continue
    }

    /// Starts a session unless one is already running.
    pub fn start_session(&mut self) -> Result<(), TrackerError> {
        if self.run_start.is_some() {
            debug!("start ignored: session already running");
            return Ok(());
        }

        let limit = match self.config.daily_limit() {
            Ok(limit) => limit,
            Err(error) => {
                self.report(&error);
                return Err(error);
            }
        };

        let now = self.clock.now();
        self.run_start = Some(now);

        let today = now.date();
        let baseline = match self.store.total_seconds_on(today) {
            Ok(total) => total,
            Err(error) => {
                self.report(&TrackerError::from(error));
                0
            }
        };

        match self.budget.take() {
            Some(mut budget) if self.budget_day == Some(today) => {
                budget.rebase(baseline);
                self.budget = Some(budget);
            }
            _ => {
                self.budget = Some(BudgetState::new(baseline, limit));
                self.budget_day = Some(today);
            }
        }

        if !self.rollover.is_checked() {
            match self.rollover.check(&mut self.store, now) {
                Ok(true) => {
                    info!("month changed since the last stored session");
                    self.sink.on_month_changed();
                }
                Ok(false) => {}
                Err(error) => self.report(&TrackerError::from(error)),
            }
        }

        info!(start = %now, baseline_seconds = baseline, "session started");
        self.sink.on_state_changed(TrackerState::Running);
        Ok(())
    }

    /// Stops the running session and persists it.
    ///
    /// The tracker is `Stopped` afterwards even when the store write fails.
    pub fn stop_session(&mut self) -> Result<(), TrackerError> {
        let Some(start) = self.run_start.take() else {
            debug!("stop ignored: no session running");
            return Ok(());
        };

        let session = Session::complete(start, self.clock.now());
        info!(
            start = %session.start_time,
            end = %session.end_time,
            duration_seconds = session.duration_seconds,
            "session stopped"
        );
        self.sink.on_state_changed(TrackerState::Stopped);

        if let Err(error) = self
            .store
            .append(session.start_time, session.end_time, session.duration_seconds)
        {
            let error = TrackerError::from(error);
            self.report(&error);
            return Err(error);
        }
        Ok(())
    }

    /// Forwards the elapsed time of the running session to the budget.
    pub fn tick(&mut self) {
        let Some(elapsed) = self.elapsed_seconds() else {
            return;
        };

        if let Some(budget) = self.budget.as_mut() {
            if let Some(notice) = budget.tick(elapsed) {
                info!(
                    hours = notice.hours,
                    minutes = notice.minutes,
                    next_limit_seconds = budget.limit_seconds,
                    "daily limit exceeded"
                );
                self.sink.on_threshold_exceeded(notice.hours, notice.minutes);
            }
        }
    }

    /// Persists any running session ahead of process exit.
    pub fn shutdown(&mut self) {
        info!("shutdown requested");
        if let Err(error) = self.stop_session() {
            warn!(%error, "session could not be saved during shutdown");
        }
    }

    fn pause(&mut self, reason: PauseReason) {
        if self.is_running() {
            if let Err(error) = self.stop_session() {
                debug!(%error, ?reason, "auto-pause stop failed");
            }
            self.pause_reasons.insert(reason);
        } else if !self.pause_reasons.is_empty() {
            // Already auto-paused for another reason; both must clear before resuming.
            self.pause_reasons.insert(reason);
        } else {
            debug!(?reason, "pause ignored: no session running");
            return;
        }
        info!(?reason, reasons = ?self.pause_reasons, "tracking paused");
    }

    fn resume(&mut self, reason: PauseReason) {
        if !self.pause_reasons.remove(reason) {
            debug!(?reason, "resume ignored: reason not active");
            return;
        }

        if self.pause_reasons.is_empty() {
            info!(?reason, "all pause reasons cleared, resuming");
            if let Err(error) = self.start_session() {
                debug!(%error, "auto-resume failed");
            }
        } else {
            debug!(?reason, remaining = ?self.pause_reasons, "resume deferred");
        }
    }

    fn report(&mut self, error: &TrackerError) {
        warn!(%error, "tracker warning");
        self.sink.on_warning(error);
    }
}
