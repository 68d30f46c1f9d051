//! Database layer for the worklog application.
//!
//! SQLite persistence for completed sessions, with a versioned migration
//! system for schema evolution.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use worklog::db::sessions::Sessions;
//! use worklog::libs::session::SessionStore;
//! use chrono::Local;
//!
//! let mut sessions = Sessions::new()?;
//! let now = Local::now().naive_local();
//! sessions.append(now, now, 0)?;
//! let total = sessions.total_seconds_on(now.date())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Core database connection and initialization module.
///
/// Provides the `Db` struct that opens the SQLite connection and applies
/// pending migrations.
pub mod db;

/// Database schema migration system.
pub mod migrations;

/// Completed work sessions.
pub mod sessions;
