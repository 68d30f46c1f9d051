//! Everything that can be posted to the tracker's event queue.
//!
//! Commands come from the user interface, signals from the background
//! monitors, ticks from the owning loop itself. All three travel through the
//! same single-consumer queue and are applied strictly in arrival order.

use tokio::sync::mpsc::UnboundedSender;

/// User-issued commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Shutdown,
}

/// Requests posted by the idle and lock monitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    IdlePauseRequested,
    IdleResumeRequested,
    LockPauseRequested,
    LockResumeRequested,
    ShutdownRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Command(Command),
    Signal(Signal),
    Tick,
}

/// Outcome of applying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Producer side of the tracker's queue, shared by every monitor.
pub type EventSender = UnboundedSender<Event>;
