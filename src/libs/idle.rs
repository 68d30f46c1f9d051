//! Idle monitor.
//!
//! Samples how long the user has been away from keyboard and mouse and turns
//! the samples into pause/resume signals for the tracker. Two thresholds form
//! a hysteresis band: crossing `idle_threshold` upwards asks for a pause,
//! dropping below `resume_threshold` asks for a resume, anything in between
//! keeps the current state.
//!
//! The OS query is abstracted behind [`IdleSource`]. A failing query counts
//! as "user is active" (0 seconds idle), so a broken source can never pause
//! tracking by itself.

use crate::libs::config::TrackerConfig;
use crate::libs::error::TrackerError;
use crate::libs::event::{Event, EventSender, Signal};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, info, warn};

/// Source of the current user-idle duration.
pub trait IdleSource: Send {
    fn idle_seconds(&mut self) -> Result<f64, TrackerError>;
}

impl<T: IdleSource + ?Sized> IdleSource for Box<T> {
    fn idle_seconds(&mut self) -> Result<f64, TrackerError> {
        (**self).idle_seconds()
    }
}

/// Edge detector over idle samples.
///
/// Holds only whether it last asked for a pause, so each transition is
/// reported exactly once.
#[derive(Debug, Clone)]
pub struct IdleDetector {
    idle_threshold: f64,
    resume_threshold: f64,
    paused: bool,
}

impl IdleDetector {
    pub fn new(idle_threshold_seconds: u64, resume_threshold_seconds: u64) -> Self {
        IdleDetector {
            idle_threshold: idle_threshold_seconds as f64,
            resume_threshold: resume_threshold_seconds as f64,
            paused: false,
        }
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.idle_threshold_seconds, config.resume_threshold_seconds)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn observe(&mut self, idle_seconds: f64) -> Option<Signal> {
        if idle_seconds >= self.idle_threshold && !self.paused {
            self.paused = true;
            Some(Signal::IdlePauseRequested)
        } else if idle_seconds < self.resume_threshold && self.paused {
            self.paused = false;
            Some(Signal::IdleResumeRequested)
        } else {
            None
        }
    }
}

pub struct IdleMonitor<I> {
    source: I,
    detector: IdleDetector,
    poll_interval: Duration,
    events: EventSender,
}

impl<I: IdleSource> IdleMonitor<I> {
    pub fn new(source: I, detector: IdleDetector, poll_interval: Duration, events: EventSender) -> Self {
        IdleMonitor {
            source,
            detector,
            poll_interval,
            events,
        }
    }

    /// Polls until `stop` flips to true, the sender is dropped or the tracker's queue closes.
    pub async fn run(mut self, mut stop: watch::Receiver<bool>) {
        info!(poll_ms = self.poll_interval.as_millis() as u64, "idle monitor started");

        loop {
            if *stop.borrow() {
                break;
            }

            let idle = match self.source.idle_seconds() {
                Ok(seconds) => seconds,
                Err(error) => {
                    warn!(%error, "idle query failed, assuming user is active");
                    0.0
                }
            };

            if let Some(signal) = self.detector.observe(idle) {
                debug!(idle_seconds = idle, ?signal, "idle transition");
                if self.events.send(Event::Signal(signal)).is_err() {
                    debug!("tracker queue closed");
                    break;
                }
            }

            tokio::select! {
                _ = time::sleep(self.poll_interval) => {}
                changed = stop.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!("idle monitor stopped");
    }
}

/// Idle source for the current platform.
pub fn system_idle_source() -> Box<dyn IdleSource> {
    #[cfg(windows)]
    {
        Box::new(windows::LastInputSource)
    }

    #[cfg(not(windows))]
    {
        Box::new(input::InputActivitySource::spawn())
    }
}

#[cfg(windows)]
mod windows {
    use super::IdleSource;
    use crate::libs::error::TrackerError;
    use winapi::um::sysinfoapi::GetTickCount;
    use winapi::um::winuser::{GetLastInputInfo, LASTINPUTINFO};

    /// `GetLastInputInfo` based idle time.
    pub struct LastInputSource;

    impl IdleSource for LastInputSource {
        fn idle_seconds(&mut self) -> Result<f64, TrackerError> {
            let mut info = LASTINPUTINFO {
                cbSize: std::mem::size_of::<LASTINPUTINFO>() as u32,
                dwTime: 0,
            };
            // SAFETY: `info` is a properly sized, initialised LASTINPUTINFO.
            let ok = unsafe { GetLastInputInfo(&mut info) };
            if ok == 0 {
                return Err(TrackerError::SignalSource("GetLastInputInfo failed".to_string()));
            }
            // SAFETY: no preconditions.
            let now = unsafe { GetTickCount() };
            Ok(now.wrapping_sub(info.dwTime) as f64 / 1000.0)
        }
    }
}

#[cfg(not(windows))]
mod input {
    use super::IdleSource;
    use crate::libs::error::TrackerError;
    use parking_lot::Mutex;
    use rdev::{listen, Event, EventType};
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use tracing::{info, warn};

    /// What the listener thread last observed.
    #[derive(Debug)]
    pub(super) struct ListenerState {
        last_input: Instant,
        failure: Option<String>,
    }

    impl ListenerState {
        pub(super) fn new(now: Instant) -> Self {
            ListenerState {
                last_input: now,
                failure: None,
            }
        }

        pub(super) fn record_input(&mut self, now: Instant) {
            self.last_input = now;
            self.failure = None;
        }

        pub(super) fn record_failure(&mut self, reason: String) {
            self.failure = Some(reason);
        }

        /// Idle time since the last input, or an error while the listener is down.
        pub(super) fn idle_seconds(&self, now: Instant) -> Result<f64, TrackerError> {
            match &self.failure {
                Some(reason) => Err(TrackerError::SignalSource(format!("input listener unavailable: {}", reason))),
                None => Ok(now.saturating_duration_since(self.last_input).as_secs_f64()),
            }
        }
    }

    /// Derives idle time from a global input listener.
    ///
    /// The listener thread records the instant of the latest keyboard, mouse
    /// or wheel event and restarts itself after a second when it fails. While
    /// it is down the source reports an error instead of a growing idle time.
    pub struct InputActivitySource {
        state: Arc<Mutex<ListenerState>>,
    }

    impl InputActivitySource {
        pub fn spawn() -> Self {
            let state = Arc::new(Mutex::new(ListenerState::new(Instant::now())));
            let shared = state.clone();

            let spawned = std::thread::Builder::new().name("input-listener".to_string()).spawn(move || loop {
                let listener_state = shared.clone();
                let result = listen(move |event: Event| match event.event_type {
                    EventType::KeyPress(_)
                    | EventType::ButtonPress(_)
                    | EventType::MouseMove { .. }
                    | EventType::Wheel { .. } => {
                        listener_state.lock().record_input(Instant::now());
                    }
                    _ => {}
                });
                match result {
                    Err(error) => {
                        warn!(?error, "input listener failed, retrying in 1 second");
                        shared.lock().record_failure(format!("{:?}", error));
                        std::thread::sleep(Duration::from_secs(1));
                    }
                    Ok(()) => {
                        info!("input listener finished");
                        shared.lock().record_failure("listener exited".to_string());
                        break;
                    }
                }
            });

            if let Err(error) = spawned {
                warn!(%error, "failed to spawn input listener thread");
                state.lock().record_failure(error.to_string());
            }

            InputActivitySource { state }
        }

        #[cfg(test)]
        pub(super) fn from_state(state: ListenerState) -> Self {
            InputActivitySource {
                state: Arc::new(Mutex::new(state)),
            }
        }
    }

    impl IdleSource for InputActivitySource {
        fn idle_seconds(&mut self) -> Result<f64, TrackerError> {
            self.state.lock().idle_seconds(Instant::now())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::libs::idle::IdleDetector;

        #[test]
        fn reports_time_since_last_input() {
            let start = Instant::now();
            let mut state = ListenerState::new(start);
            state.record_input(start + Duration::from_secs(10));

            let idle = state.idle_seconds(start + Duration::from_secs(310)).unwrap();

            assert_eq!(idle, 300.0);
        }

        #[test]
        fn failed_listener_is_an_error_not_idle_time() {
            let start = Instant::now();
            let mut state = ListenerState::new(start);
            state.record_failure("MissingDisplayError".to_string());

            let result = state.idle_seconds(start + Duration::from_secs(600));

            assert!(matches!(result, Err(TrackerError::SignalSource(_))));
        }

        #[test]
        fn input_after_failure_restores_readings() {
            let start = Instant::now();
            let mut state = ListenerState::new(start);
            state.record_failure("MissingDisplayError".to_string());
            state.record_input(start + Duration::from_secs(5));

            assert_eq!(state.idle_seconds(start + Duration::from_secs(7)).unwrap(), 2.0);
        }

        #[test]
        fn dead_listener_never_pauses_tracking() {
            let long_ago = Instant::now().checked_sub(Duration::from_secs(3600)).unwrap_or_else(Instant::now);
            let mut state = ListenerState::new(long_ago);
            state.record_failure("MissingDisplayError".to_string());
            let mut source = InputActivitySource::from_state(state);
            let mut detector = IdleDetector::new(300, 2);

            // Same fallback as the monitor loop
            let idle = source.idle_seconds().unwrap_or(0.0);

            assert_eq!(detector.observe(idle), None);
            assert!(!detector.is_paused());
        }
    }
}
