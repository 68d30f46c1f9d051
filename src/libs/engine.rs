//! The tracker's owning execution context.
//!
//! Monitors and the UI never call the state machine directly. They post
//! [`Event`]s into an unbounded single-consumer queue; [`EventQueue::run`]
//! drains it one event at a time and interleaves a once-per-second tick.
//! Queued events always win over a due tick, so a pause signal is applied
//! before the budget sees another second.

use crate::libs::clock::Clock;
use crate::libs::event::{Command, Event, EventSender, Flow, Signal};
use crate::libs::notify::NotificationSink;
use crate::libs::session::SessionStore;
use crate::libs::tracker::Tracker;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

/// Resolution of the elapsed-time and budget updates.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Cloneable producer handle: the commands the user interface may issue.
#[derive(Debug, Clone)]
pub struct TrackerHandle {
    events: EventSender,
}

impl TrackerHandle {
    /// Returns false once the event loop has exited.
    pub fn start(&self) -> bool {
        self.send(Event::Command(Command::Start))
    }

    pub fn stop(&self) -> bool {
        self.send(Event::Command(Command::Stop))
    }

    pub fn shutdown(&self) -> bool {
        self.send(Event::Command(Command::Shutdown))
    }

    pub fn signal(&self, signal: Signal) -> bool {
        self.send(Event::Signal(signal))
    }

    /// Raw sender for monitors living on other threads or tasks.
    pub fn sender(&self) -> EventSender {
        self.events.clone()
    }

    fn send(&self, event: Event) -> bool {
        self.events.send(event).is_ok()
    }
}

/// Consumer side of the queue. There is exactly one per tracker.
#[derive(Debug)]
pub struct EventQueue {
    events: UnboundedReceiver<Event>,
}

/// Creates a connected handle/queue pair.
pub fn queue() -> (TrackerHandle, EventQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (TrackerHandle { events: tx }, EventQueue { events: rx })
}

impl EventQueue {
    /// Runs the tracker until a shutdown is applied or every producer is gone.
    ///
    /// The tracker is handed back so callers can inspect its final state.
    pub async fn run<S, C, N>(mut self, mut tracker: Tracker<S, C, N>, tick_every: Duration) -> Tracker<S, C, N>
    where
        S: SessionStore,
        C: Clock,
        N: NotificationSink,
    {
        let mut ticker = time::interval(tick_every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(tick_ms = tick_every.as_millis() as u64, "tracker event loop started");

        loop {
            let event = tokio::select! {
                biased;
                received = self.events.recv() => match received {
                    Some(event) => event,
                    None => {
                        debug!("all producers dropped, shutting down");
                        Event::Command(Command::Shutdown)
                    }
                },
                _ = ticker.tick() => Event::Tick,
            };

            if event != Event::Tick {
                debug!(?event, "applying event");
            }
            if tracker.apply(event) == Flow::Exit {
                break;
            }
        }

        info!("tracker event loop finished");
        tracker
    }
}
