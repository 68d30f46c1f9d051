//! # Worklog - automatic work session tracking
//!
//! Records active-work sessions, pauses them while the user is idle or the
//! screen is locked, and warns when the daily work-time budget is spent.
//!
//! ## Features
//!
//! - **Session Tracking**: Start/stop state machine persisting every session to SQLite
//! - **Auto-Pause**: Idle and screen-lock monitors with automatic resume
//! - **Daily Budget**: Escalating reminders once today's limit is exceeded
//! - **Month Rollover**: Export reminder on the first start of a new month
//! - **Data Export**: CSV and Excel with a configurable cell layout
//!
//! ## Usage
//!
//! ```rust,no_run
//! use worklog::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
