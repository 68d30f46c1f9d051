//! Core library modules for the worklog application.
//!
//! ## Features
//!
//! - **Tracking Engine**: Session state machine, event queue, daily budget, month rollover
//! - **Monitors**: Idle and screen-lock detection feeding the event queue
//! - **Core Infrastructure**: Configuration, data storage, clock, errors, messaging
//! - **User Interface**: Console notifications, tables, formatting, export
//!
//! ## Usage
//!
//! ```rust,no_run
//! use worklog::db::sessions::Sessions;
//! use worklog::libs::clock::SystemClock;
//! use worklog::libs::config::TrackerConfig;
//! use worklog::libs::notify::ConsoleNotifier;
//! use worklog::libs::tracker::Tracker;
//!
//! let config = TrackerConfig {
//!     daily_limit_seconds: Some(8 * 3600),
//!     ..TrackerConfig::default()
//! };
//! let mut tracker = Tracker::new(config, Sessions::new()?, SystemClock, ConsoleNotifier);
//! tracker.start_session()?;
//! tracker.stop_session()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod budget;
pub mod clock;
pub mod config;
pub mod daemon;
pub mod data_storage;
pub mod engine;
pub mod error;
pub mod event;
pub mod export;
pub mod formatter;
pub mod idle;
pub mod lock;
pub mod messages;
pub mod notify;
pub mod rollover;
pub mod session;
pub mod tracker;
pub mod view;
