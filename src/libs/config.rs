//! Configuration management for worklog.
//!
//! Settings live in a single JSON file inside the platform data directory
//! resolved by [`DataStorage`]. Each concern has its own optional section so
//! a fresh install works with nothing configured and the wizard only asks
//! about what the user selects.
//!
//! ## Sections
//!
//! - **Tracker**: idle/resume thresholds, poll interval and the daily limit
//! - **Export**: spreadsheet location, sheet name and start cells
//!
//! ## Usage
//!
//! ```rust,no_run
//! use worklog::libs::config::Config;
//!
//! let config = Config::read()?;
//! let tracker = config.tracker.unwrap_or_default();
//! let limit = tracker.daily_limit()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::error::TrackerError;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::Path;
use std::time::Duration;

/// Configuration file name inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Represents a configurable section shown by the setup wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

/// Thresholds consumed by the session tracking engine.
///
/// The engine reads these once at construction; changing the file has no
/// effect on a running `watch`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Idle time in seconds after which a running session is paused.
    pub idle_threshold_seconds: u64,

    /// Idle time in seconds below which an idle pause is resumed.
    ///
    /// Values between this and `idle_threshold_seconds` never change state,
    /// which keeps the tracker from flapping around a single boundary.
    pub resume_threshold_seconds: u64,

    /// How often the OS idle time is sampled.
    pub poll_interval_seconds: u64,

    /// Cumulative seconds per day after which the budget notification fires.
    ///
    /// There is no default: starting a session without it is an error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_limit_seconds: Option<u64>,
}

impl Default for TrackerConfig {
    /// 5 minutes idle threshold, 2 seconds resume threshold, 5 seconds poll
    /// interval, no daily limit.
    fn default() -> Self {
        TrackerConfig {
            idle_threshold_seconds: 300,
            resume_threshold_seconds: 2,
            poll_interval_seconds: 5,
            daily_limit_seconds: None,
        }
    }
}

impl TrackerConfig {
    pub fn daily_limit(&self) -> Result<u64, TrackerError> {
        self.daily_limit_seconds
            .ok_or_else(|| TrackerError::Configuration(Message::DailyLimitMissing.to_string()))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds.max(1))
    }

    /// Rejects threshold combinations that would make the idle monitor flap.
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.resume_threshold_seconds >= self.idle_threshold_seconds {
            return Err(TrackerError::Configuration(
                Message::InvalidIdleThresholds {
                    idle: self.idle_threshold_seconds,
                    resume: self.resume_threshold_seconds,
                }
                .to_string(),
            ));
        }
        Ok(())
    }
}

/// Spreadsheet export settings.
///
/// Each `*_cell` names the cell where the first exported row goes; later rows
/// continue downwards in the same column. An empty cell skips that column.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub excel_path: String,
    pub sheet: String,
    pub date_cell: String,
    pub start_cell: String,
    pub end_cell: String,
    pub duration_cell: String,
    /// One row per day instead of one row per session.
    pub date_based: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            excel_path: String::new(),
            sheet: "Sheet1".to_string(),
            date_cell: "A1".to_string(),
            start_cell: "B1".to_string(),
            end_cell: "C1".to_string(),
            duration_cell: "D1".to_string(),
            date_based: true,
        }
    }
}

/// Root configuration object.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker: Option<TrackerConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportConfig>,
}

impl Config {
    /// Reads the configuration from the data directory.
    ///
    /// A missing file is not an error: the default configuration is returned.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        Self::read_from(&config_file_path)
    }

    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        self.save_to(&config_file_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes the configuration file. Returns whether a file was deleted.
    pub fn delete() -> Result<bool> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(false);
        }
        fs::remove_file(config_file_path)?;
        Ok(true)
    }

    /// Runs the interactive setup wizard, pre-filled with the current values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = [
            ConfigModule {
                key: "tracker".to_string(),
                name: "Tracker".to_string(),
            },
            ConfigModule {
                key: "export".to_string(),
                name: "Export".to_string(),
            },
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "tracker" => {
                    let default = config.tracker.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleTracker);
                    let tracker = TrackerConfig {
                        idle_threshold_seconds: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptIdleThreshold.to_string())
                            .default(default.idle_threshold_seconds)
                            .interact_text()?,
                        resume_threshold_seconds: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptResumeThreshold.to_string())
                            .default(default.resume_threshold_seconds)
                            .interact_text()?,
                        poll_interval_seconds: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptPollInterval.to_string())
                            .default(default.poll_interval_seconds)
                            .interact_text()?,
                        daily_limit_seconds: Some(
                            Input::<u64>::with_theme(&ColorfulTheme::default())
                                .with_prompt(Message::PromptDailyLimitMinutes.to_string())
                                .default(default.daily_limit_seconds.map(|s| s / 60).unwrap_or(480))
                                .interact_text()?
                                * 60,
                        ),
                    };
                    tracker.validate()?;
                    config.tracker = Some(tracker);
                }
                "export" => {
                    let default = config.export.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleExport);
                    config.export = Some(ExportConfig {
                        excel_path: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptExcelPath.to_string())
                            .default(default.excel_path)
                            .allow_empty(true)
                            .interact_text()?,
                        sheet: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptSheetName.to_string())
                            .default(default.sheet)
                            .interact_text()?,
                        date_cell: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptCell("date").to_string())
                            .default(default.date_cell)
                            .allow_empty(true)
                            .interact_text()?,
                        start_cell: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptCell("start").to_string())
                            .default(default.start_cell)
                            .allow_empty(true)
                            .interact_text()?,
                        end_cell: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptCell("end").to_string())
                            .default(default.end_cell)
                            .allow_empty(true)
                            .interact_text()?,
                        duration_cell: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptCell("duration").to_string())
                            .default(default.duration_cell)
                            .allow_empty(true)
                            .interact_text()?,
                        date_based: Confirm::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptDateBased.to_string())
                            .default(default.date_based)
                            .interact()?,
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
