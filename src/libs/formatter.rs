//! Duration and time formatting for tables and exports.
//!
//! Durations are rendered as `HH:MM:SS`; hours are not wrapped at 24 so a
//! long day stays readable. Negative inputs render as zero.
//!
//! ```rust
//! use worklog::libs::formatter::{format_duration, format_hours_minutes};
//!
//! assert_eq!(format_duration(5_430), "01:30:30");
//! assert_eq!(format_hours_minutes(5_430), "01:30");
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const TIME_FORMAT: &str = "%H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A session with every field pre-formatted for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormattedSession {
    pub id: usize,
    pub start: String,
    pub end: String,
    pub duration: String,
}

/// Formats whole seconds as `HH:MM:SS`.
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}:{:02}", seconds / 3600, (seconds % 3600) / 60, seconds % 60)
}

/// Formats whole seconds as `HH:MM`, dropping the seconds.
pub fn format_hours_minutes(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 3600, (seconds % 3600) / 60)
}

pub fn format_time(time: &NaiveDateTime) -> String {
    time.format(TIME_FORMAT).to_string()
}
