//! Lock monitor.
//!
//! Listens for OS session notifications (screen locked, unlocked, session
//! ending) on a dedicated thread, because receiving them blocks. Each
//! notification is converted into a tracker [`Signal`] and posted to the
//! queue; the thread never touches tracker state itself.
//!
//! Windows delivers WTS notifications to a hidden window, Linux asks
//! systemd-logind. If the platform cannot deliver notifications, the monitor
//! logs once and exits. Idle-based tracking keeps working without it.

use crate::libs::error::TrackerError;
use crate::libs::event::{Event, EventSender, Signal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long one blocking receive may take before the stop flag is re-checked.
pub const RECEIVE_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Locked,
    Unlocked,
    EndSession,
}

/// Subscription to OS session-change notifications.
pub trait SessionEventSource: Send {
    fn register(&mut self) -> Result<(), TrackerError>;

    /// Blocks for at most `timeout`. `Ok(None)` means nothing happened.
    fn next_event(&mut self, timeout: Duration) -> Result<Option<SessionEvent>, TrackerError>;

    fn unregister(&mut self);
}

impl<T: SessionEventSource + ?Sized> SessionEventSource for Box<T> {
    fn register(&mut self) -> Result<(), TrackerError> {
        (**self).register()
    }

    fn next_event(&mut self, timeout: Duration) -> Result<Option<SessionEvent>, TrackerError> {
        (**self).next_event(timeout)
    }

    fn unregister(&mut self) {
        (**self).unregister()
    }
}

/// Edge detector over session notifications.
#[derive(Debug, Clone, Default)]
pub struct LockDetector {
    locked: bool,
}

impl LockDetector {
    pub fn observe(&mut self, event: SessionEvent) -> Option<Signal> {
        match event {
            SessionEvent::Locked if !self.locked => {
                self.locked = true;
                Some(Signal::LockPauseRequested)
            }
            SessionEvent::Unlocked if self.locked => {
                self.locked = false;
                Some(Signal::LockResumeRequested)
            }
            SessionEvent::EndSession => Some(Signal::ShutdownRequested),
            _ => None,
        }
    }
}

/// Handle to the running lock monitor thread.
pub struct LockMonitor {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl LockMonitor {
    pub fn spawn<S>(source: S, events: EventSender) -> std::io::Result<Self>
    where
        S: SessionEventSource + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();
        let thread = std::thread::Builder::new()
            .name("lock-monitor".to_string())
            .spawn(move || receive_loop(source, events, thread_stop))?;

        Ok(LockMonitor {
            stop,
            thread: Some(thread),
        })
    }

    /// Asks the loop to unregister and exit, then waits for it.
    pub fn stop(mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("lock monitor thread panicked");
            }
        }
    }
}

fn receive_loop<S: SessionEventSource>(mut source: S, events: EventSender, stop: Arc<AtomicBool>) {
    if let Err(error) = source.register() {
        warn!(%error, "session notifications unavailable, lock detection disabled");
        return;
    }
    info!("lock monitor started");

    let mut detector = LockDetector::default();
    while !stop.load(Ordering::SeqCst) {
        let event = match source.next_event(RECEIVE_TIMEOUT) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(error) => {
                warn!(%error, "session notification receive failed");
                std::thread::sleep(RECEIVE_TIMEOUT);
                continue;
            }
        };

        let Some(signal) = detector.observe(event) else {
            continue;
        };
        debug!(?event, ?signal, "session transition");
        if events.send(Event::Signal(signal)).is_err() {
            debug!("tracker queue closed");
            break;
        }
    }

    source.unregister();
    info!("lock monitor stopped");
}

/// Session notification source for the current platform.
pub fn system_session_source() -> Box<dyn SessionEventSource> {
    #[cfg(windows)]
    {
        Box::new(wts::WtsSource::default())
    }

    #[cfg(target_os = "linux")]
    {
        Box::new(logind::LogindSource::from_env())
    }

    #[cfg(not(any(windows, target_os = "linux")))]
    {
        Box::new(UnsupportedSource)
    }
}

/// Source for platforms without a supported notification mechanism.
#[derive(Debug, Default)]
pub struct UnsupportedSource;

impl SessionEventSource for UnsupportedSource {
    fn register(&mut self) -> Result<(), TrackerError> {
        Err(TrackerError::SignalSource(format!(
            "session notifications are not supported on {}",
            std::env::consts::OS
        )))
    }

    fn next_event(&mut self, _timeout: Duration) -> Result<Option<SessionEvent>, TrackerError> {
        Ok(None)
    }

    fn unregister(&mut self) {}
}

#[cfg(windows)]
pub mod wts {
    //! WTS session notifications delivered to a hidden window.
    //!
    //! The window is created, pumped and destroyed on the lock monitor thread.
    //! Its window procedure queues events in a thread-local buffer which
    //! `next_event` drains after pumping.

    use super::{SessionEvent, SessionEventSource};
    use crate::libs::error::TrackerError;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::ptr;
    use std::time::Duration;
    use winapi::shared::minwindef::{BOOL, DWORD, LPARAM, LRESULT, UINT, WPARAM};
    use winapi::shared::windef::HWND;
    use winapi::um::libloaderapi::GetModuleHandleW;
    use winapi::um::winuser::{
        CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, MsgWaitForMultipleObjects, PeekMessageW,
        RegisterClassW, TranslateMessage, MSG, PM_REMOVE, QS_ALLINPUT, WM_QUERYENDSESSION, WNDCLASSW,
    };

    const WM_WTSSESSION_CHANGE: UINT = 0x02B1;
    const WTS_SESSION_LOCK: WPARAM = 0x7;
    const WTS_SESSION_UNLOCK: WPARAM = 0x8;
    const NOTIFY_FOR_THIS_SESSION: DWORD = 0;
    const WINDOW_CLASS: &str = "WorklogSessionWindow";

    #[link(name = "wtsapi32")]
    extern "system" {
        fn WTSRegisterSessionNotification(hwnd: HWND, flags: DWORD) -> BOOL;
        fn WTSUnRegisterSessionNotification(hwnd: HWND) -> BOOL;
    }

    thread_local! {
        static PENDING: RefCell<VecDeque<SessionEvent>> = RefCell::new(VecDeque::new());
    }

    /// Maps a window message to a session event.
    pub fn map_message(msg: UINT, wparam: WPARAM) -> Option<SessionEvent> {
        match (msg, wparam) {
            (WM_WTSSESSION_CHANGE, WTS_SESSION_LOCK) => Some(SessionEvent::Locked),
            (WM_WTSSESSION_CHANGE, WTS_SESSION_UNLOCK) => Some(SessionEvent::Unlocked),
            (WM_QUERYENDSESSION, _) => Some(SessionEvent::EndSession),
            _ => None,
        }
    }

    unsafe extern "system" fn window_proc(hwnd: HWND, msg: UINT, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
        match map_message(msg, wparam) {
            Some(event) => {
                PENDING.with(|pending| pending.borrow_mut().push_back(event));
                // TRUE lets the session end continue
                if msg == WM_QUERYENDSESSION {
                    1
                } else {
                    0
                }
            }
            None => DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }

    fn pop_pending() -> Option<SessionEvent> {
        PENDING.with(|pending| pending.borrow_mut().pop_front())
    }

    fn wide(value: &str) -> Vec<u16> {
        value.encode_utf16().chain(std::iter::once(0)).collect()
    }

    #[derive(Debug, Default)]
    pub struct WtsSource {
        window: Option<HWND>,
    }

    // SAFETY: the handle is only created and used on the thread that calls
    // `register`, `next_event` and `unregister`.
    unsafe impl Send for WtsSource {}

    impl SessionEventSource for WtsSource {
        fn register(&mut self) -> Result<(), TrackerError> {
            let class_name = wide(WINDOW_CLASS);
            // SAFETY: every pointer passed below outlives the call; the class
            // name buffer lives until the end of this function.
            unsafe {
                let instance = GetModuleHandleW(ptr::null());
                let mut class: WNDCLASSW = std::mem::zeroed();
                class.lpfnWndProc = Some(window_proc);
                class.hInstance = instance;
                class.lpszClassName = class_name.as_ptr();
                // Fails if the class already exists in this process; CreateWindowExW still works then.
                RegisterClassW(&class);

                let hwnd = CreateWindowExW(
                    0,
                    class_name.as_ptr(),
                    class_name.as_ptr(),
                    0,
                    0,
                    0,
                    0,
                    0,
                    ptr::null_mut(),
                    ptr::null_mut(),
                    instance,
                    ptr::null_mut(),
                );
                if hwnd.is_null() {
                    return Err(TrackerError::SignalSource("CreateWindowExW failed".to_string()));
                }
                if WTSRegisterSessionNotification(hwnd, NOTIFY_FOR_THIS_SESSION) == 0 {
                    DestroyWindow(hwnd);
                    return Err(TrackerError::SignalSource(
                        "WTSRegisterSessionNotification failed".to_string(),
                    ));
                }
                self.window = Some(hwnd);
            }
            Ok(())
        }

        fn next_event(&mut self, timeout: Duration) -> Result<Option<SessionEvent>, TrackerError> {
            if let Some(event) = pop_pending() {
                return Ok(Some(event));
            }
            if self.window.is_none() {
                std::thread::sleep(timeout);
                return Ok(None);
            }

            let timeout_ms = timeout.as_millis().min(DWORD::MAX as u128) as DWORD;
            // SAFETY: waits on no handles and pumps this thread's own queue.
            unsafe {
                MsgWaitForMultipleObjects(0, ptr::null(), 0, timeout_ms, QS_ALLINPUT);
                let mut msg: MSG = std::mem::zeroed();
                while PeekMessageW(&mut msg, ptr::null_mut(), 0, 0, PM_REMOVE) != 0 {
                    TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                }
            }
            Ok(pop_pending())
        }

        fn unregister(&mut self) {
            if let Some(hwnd) = self.window.take() {
                // SAFETY: `hwnd` was created by `register` on this thread.
                unsafe {
                    WTSUnRegisterSessionNotification(hwnd);
                    DestroyWindow(hwnd);
                }
            }
        }
    }

}

#[cfg(any(target_os = "linux", test))]
pub mod logind {
    //! systemd-logind through `loginctl`, polled once per receive.

    use super::{SessionEvent, SessionEventSource};
    use crate::libs::error::TrackerError;
    use std::process::Command;
    use std::time::Duration;

    /// Parsed subset of `loginctl show-session` output.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SessionProperties {
        pub locked: bool,
        pub closing: bool,
    }

    /// Parses `Key=value` lines as printed by `loginctl show-session -p LockedHint -p State`.
    pub fn parse_properties(output: &str) -> Option<SessionProperties> {
        let mut locked = None;
        let mut closing = false;
        for line in output.lines() {
            match line.trim().split_once('=') {
                Some(("LockedHint", value)) => locked = Some(value == "yes"),
                Some(("State", value)) => closing = value == "closing",
                _ => {}
            }
        }
        locked.map(|locked| SessionProperties { locked, closing })
    }

    pub struct LogindSource {
        session_id: Option<String>,
        locked: bool,
        ended: bool,
    }

    impl LogindSource {
        pub fn from_env() -> Self {
            LogindSource {
                session_id: std::env::var("XDG_SESSION_ID").ok().filter(|id| !id.is_empty()),
                locked: false,
                ended: false,
            }
        }

        fn query(&self, session_id: &str) -> Result<SessionProperties, TrackerError> {
            let output = Command::new("loginctl")
                .args(["show-session", session_id, "-p", "LockedHint", "-p", "State"])
                .output()
                .map_err(|e| TrackerError::SignalSource(format!("loginctl: {e}")))?;
            if !output.status.success() {
                return Err(TrackerError::SignalSource(format!(
                    "loginctl exited with {}",
                    output.status
                )));
            }
            parse_properties(&String::from_utf8_lossy(&output.stdout))
                .ok_or_else(|| TrackerError::SignalSource("loginctl reported no LockedHint".to_string()))
        }
    }

    impl SessionEventSource for LogindSource {
        fn register(&mut self) -> Result<(), TrackerError> {
            let Some(session_id) = self.session_id.clone() else {
                return Err(TrackerError::SignalSource("XDG_SESSION_ID is not set".to_string()));
            };
            self.locked = self.query(&session_id)?.locked;
            Ok(())
        }

        fn next_event(&mut self, timeout: Duration) -> Result<Option<SessionEvent>, TrackerError> {
            std::thread::sleep(timeout);
            let Some(session_id) = self.session_id.clone() else {
                return Ok(None);
            };
            let properties = self.query(&session_id)?;

            if properties.closing && !self.ended {
                self.ended = true;
                return Ok(Some(SessionEvent::EndSession));
            }
            if properties.locked != self.locked {
                self.locked = properties.locked;
                return Ok(Some(if properties.locked {
                    SessionEvent::Locked
                } else {
                    SessionEvent::Unlocked
                }));
            }
            Ok(None)
        }

        fn unregister(&mut self) {
            self.session_id = None;
        }
    }
}
