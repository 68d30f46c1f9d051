//! Foreground runtime for the watch command.
//!
//! Wires the tracker to its producers and owns their lifecycle:
//! - the idle monitor task, stopped through a watch channel,
//! - the lock monitor thread, stopped through its handle,
//! - OS signal handling (SIGTERM/SIGINT, Ctrl+C on Windows),
//! - console commands read from stdin.
//!
//! Every producer talks to the tracker exclusively through the event queue.

use crate::db::sessions::Sessions;
use crate::libs::clock::SystemClock;
use crate::libs::config::Config;
use crate::libs::engine::{self, TrackerHandle, TICK_INTERVAL};
use crate::libs::event::Command;
use crate::libs::idle::{system_idle_source, IdleDetector, IdleMonitor};
use crate::libs::lock::{system_session_source, LockMonitor};
use crate::libs::messages::Message;
use crate::libs::notify::ConsoleNotifier;
use crate::libs::tracker::Tracker;
use crate::{msg_error, msg_info, msg_print, msg_warning};
use anyhow::Result;
use std::io::BufRead;
use tokio::sync::watch;
use tracing::debug;

/// A line typed into the watch console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    Command(Command),
    Help,
    Empty,
    Unknown(String),
}

impl ConsoleInput {
    pub fn parse(line: &str) -> Self {
        let line = line.trim().to_lowercase();
        match line.as_str() {
            "" => ConsoleInput::Empty,
            "start" => ConsoleInput::Command(Command::Start),
            "stop" => ConsoleInput::Command(Command::Stop),
            "quit" | "exit" => ConsoleInput::Command(Command::Shutdown),
            "help" | "?" => ConsoleInput::Help,
            _ => ConsoleInput::Unknown(line),
        }
    }
}

/// Runs the tracking engine until a shutdown arrives from a signal, the
/// console or the session ending.
pub async fn run_with_signal_handling(start: bool) -> Result<()> {
    let tracker_config = Config::read()?.tracker.unwrap_or_default();
    tracker_config.validate()?;

    let tracker = Tracker::new(tracker_config.clone(), Sessions::new()?, SystemClock, ConsoleNotifier);
    let (handle, queue) = engine::queue();

    let (stop_idle, idle_stopped) = watch::channel(false);
    let idle_monitor = IdleMonitor::new(
        system_idle_source(),
        IdleDetector::from_config(&tracker_config),
        tracker_config.poll_interval(),
        handle.sender(),
    );
    let idle_task = tokio::spawn(idle_monitor.run(idle_stopped));

    let lock_monitor = match LockMonitor::spawn(system_session_source(), handle.sender()) {
        Ok(monitor) => Some(monitor),
        Err(e) => {
            msg_warning!(Message::LockMonitorSpawnFailed(e.to_string()));
            None
        }
    };

    spawn_signal_handler(handle.clone());
    if let Err(e) = spawn_console_reader(handle.clone()) {
        debug!(error = %e, "console commands unavailable");
    }

    msg_info!(Message::WatcherStarted);
    if start {
        handle.start();
    }
    drop(handle);

    queue.run(tracker, TICK_INTERVAL).await;

    // The running session is already persisted and the queue is gone, so
    // anything the monitors still post is discarded.
    let _ = stop_idle.send(true);
    if let Err(e) = idle_task.await {
        debug!(error = %e, "idle monitor task ended abnormally");
    }
    if let Some(monitor) = lock_monitor {
        if let Err(e) = tokio::task::spawn_blocking(move || monitor.stop()).await {
            debug!(error = %e, "lock monitor shutdown failed");
        }
    }

    msg_info!(Message::WatcherStopped);
    Ok(())
}

fn spawn_signal_handler(handle: TrackerHandle) {
    #[cfg(unix)]
    {
        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};

            let (mut sigterm, mut sigint) = match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
                (Err(e), _) | (_, Err(e)) => {
                    msg_error!(Message::SignalHandlerFailed(e.to_string()));
                    return;
                }
            };

            tokio::select! {
                _ = sigterm.recv() => {
                    msg_info!(Message::WatcherReceivedSigterm);
                }
                _ = sigint.recv() => {
                    msg_info!(Message::WatcherReceivedSigint);
                }
            }

            handle.shutdown();
        });
    }

    #[cfg(windows)]
    {
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    msg_info!(Message::WatcherReceivedCtrlC);
                    handle.shutdown();
                }
                Err(e) => {
                    msg_error!(Message::WatcherCtrlCListenFailed(e.to_string()));
                }
            }
        });
    }

    #[cfg(not(any(unix, windows)))]
    {
        let _ = handle;
        msg_warning!(Message::WatcherSignalHandlingNotSupported);
    }
}

// A blocking stdin read cannot be cancelled, so the reader lives on a detached
// thread instead of a runtime task.
fn spawn_console_reader(handle: TrackerHandle) -> std::io::Result<()> {
    std::thread::Builder::new().name("console-commands".to_string()).spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let delivered = match ConsoleInput::parse(&line) {
                ConsoleInput::Command(Command::Start) => handle.start(),
                ConsoleInput::Command(Command::Stop) => handle.stop(),
                ConsoleInput::Command(Command::Shutdown) => {
                    handle.shutdown();
                    false
                }
                ConsoleInput::Help => {
                    msg_print!(Message::WatchHelp);
                    true
                }
                ConsoleInput::Empty => true,
                ConsoleInput::Unknown(input) => {
                    msg_warning!(Message::UnknownWatchCommand(input));
                    true
                }
            };
            if !delivered {
                break;
            }
        }
    })?;
    Ok(())
}
