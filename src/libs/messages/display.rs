//! Text of every [`Message`].
//!
//! Keeping all wording in one match makes it easy to review the tone of the
//! whole application at once and forces a decision for every new variant.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === SESSION MESSAGES ===
            Message::SessionStarted => "Session started".to_string(),
            Message::SessionStopped => "Session stopped".to_string(),
            Message::DailyLimitExceeded { hours, minutes } => format!(
                "You have worked {}h {:02}m today. Time to wrap up? You will be reminded again in 30 minutes.",
                hours, minutes
            ),
            Message::MonthChanged => {
                "A new month has started. Run 'worklog export' to export last month's sessions.".to_string()
            }
            Message::TrackerWarning(error) => format!("Tracker warning: {}", error),

            // === SESSION LIST MESSAGES ===
            Message::SessionsHeader(date) => format!("Sessions for {}", date),
            Message::NoSessionsForDate(date) => format!("No sessions recorded for {}", date),
            Message::SessionsTotal(total) => format!("Total: {}", total),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration deleted".to_string(),
            Message::ConfigNotFound => "No configuration file to delete".to_string(),
            Message::ConfigModuleTracker => "Tracker settings".to_string(),
            Message::ConfigModuleExport => "Export settings".to_string(),
            Message::DailyLimitMissing => {
                "Daily limit is not configured. Run 'worklog init' and set up the Tracker module.".to_string()
            }
            Message::InvalidIdleThresholds { idle, resume } => format!(
                "Resume threshold ({}s) must be lower than idle threshold ({}s)",
                resume, idle
            ),

            // === PROMPTS ===
            Message::PromptSelectModules => "Select modules to configure (space to select, enter to confirm)".to_string(),
            Message::PromptIdleThreshold => "Pause after being idle for (seconds)".to_string(),
            Message::PromptResumeThreshold => "Resume when idle time drops below (seconds)".to_string(),
            Message::PromptPollInterval => "Idle poll interval (seconds)".to_string(),
            Message::PromptDailyLimitMinutes => "Daily work limit (minutes)".to_string(),
            Message::PromptExcelPath => "Default export file".to_string(),
            Message::PromptSheetName => "Worksheet name".to_string(),
            Message::PromptCell(column) => format!("First cell for the {} column (empty to skip)", column),
            Message::PromptDateBased => "Export one row per day?".to_string(),

            // === WATCH MESSAGES ===
            Message::WatcherStarted => "Watching activity. Type 'start', 'stop' or 'quit' and press Enter.".to_string(),
            Message::WatcherStopped => "Watcher stopped".to_string(),
            Message::WatchHelp => "Commands: start, stop, quit".to_string(),
            Message::UnknownWatchCommand(input) => format!("Unknown command '{}'", input),
            Message::WatcherReceivedSigterm => "Received SIGTERM, shutting down...".to_string(),
            Message::WatcherReceivedSigint => "Received SIGINT, shutting down...".to_string(),
            Message::WatcherReceivedCtrlC => "Received Ctrl+C, shutting down...".to_string(),
            Message::WatcherCtrlCListenFailed(error) => format!("Failed to listen for Ctrl+C: {}", error),
            Message::WatcherSignalHandlingNotSupported => "Signal handling is not supported on this platform".to_string(),
            Message::SignalHandlerFailed(error) => format!("Failed to install signal handlers: {}", error),
            Message::LockMonitorSpawnFailed(error) => format!("Failed to start lock monitor: {}", error),

            // === EXPORT MESSAGES ===
            Message::ExportCompleted { rows, path } => format!("Exported {} row(s) to {}", rows, path),
            Message::NothingToExport => "No sessions to export".to_string(),
            Message::InvalidCellReference(cell) => format!("Invalid cell reference: '{}'", cell),
            Message::ExportPathMissing => {
                "No output file given. Pass --output or set the export file with 'worklog init'.".to_string()
            }
            Message::ExportTargetExists(path) => {
                format!("'{}' already exists. Pass --force to replace it.", path)
            }
            Message::ConfirmOverwrite(path) => {
                format!("'{}' already exists and will be replaced, losing its current content. Continue?", path)
            }
            Message::ExportCancelled => "Export cancelled".to_string(),

            // === RESET MESSAGES ===
            Message::ConfirmReset(count) => format!("Delete all {} stored session(s)? This cannot be undone.", count),
            Message::ResetCompleted(count) => format!("Deleted {} session(s)", count),
            Message::ResetCancelled => "Reset cancelled".to_string(),
            Message::NothingToReset => "There are no stored sessions".to_string(),

            // === DATABASE MESSAGES ===
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::DatabaseInitialized(version) => format!("Database schema is at version {}", version),

            // === GENERIC ===
            Message::InvalidDate(input) => format!("Invalid date '{}'. Use YYYY-MM-DD or 'today'.", input),
        };
        write!(f, "{}", text)
    }
}
