//! Session export to CSV and Excel.
//!
//! Sessions are first reduced to [`ExportRow`]s, either one per session
//! ([`flat_rows`]) or one per calendar day ([`date_based_rows`]). The
//! [`Exporter`] then writes them in the requested format.
//!
//! The Excel writer honours the cell layout from [`ExportConfig`]: every
//! column starts at its configured cell (e.g. `B7`) and moves one row down per
//! record. Columns whose cell is left empty are not written.
//!
//! rust_xlsxwriter only creates workbooks, so an Excel export replaces the
//! whole target file. An existing target is therefore refused unless the
//! exporter was built with [`Exporter::overwrite`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use worklog::db::sessions::Sessions;
//! use worklog::libs::config::ExportConfig;
//! use worklog::libs::export::{date_based_rows, ExportFormat, Exporter};
//!
//! let sessions = Sessions::new()?.fetch_all()?;
//! let rows = date_based_rows(&sessions);
//! Exporter::new(ExportFormat::Excel, "hours.xlsx".into()).export(&rows, &ExportConfig::default())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::libs::config::ExportConfig;
use crate::libs::formatter::{format_duration, format_time, DATE_FORMAT};
use crate::libs::messages::Message;
use crate::libs::session::Session;
use crate::{msg_bail_anyhow, msg_error_anyhow};
use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use rust_xlsxwriter::Workbook;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const MAX_ROW: u32 = 1_048_576;
const MAX_COLUMN: u16 = 16_384;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// `.xlsx` workbook laid out by the configured cells.
    Excel,
}

/// One exported line: date, start, end and duration, already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub date: String,
    pub start: String,
    pub end: String,
    pub duration: String,
}

/// One row per session, in the given order.
pub fn flat_rows(sessions: &[Session]) -> Vec<ExportRow> {
    sessions
        .iter()
        .map(|session| ExportRow {
            date: session.date().format(DATE_FORMAT).to_string(),
            start: format_time(&session.start_time),
            end: format_time(&session.end_time),
            duration: format_duration(session.duration_seconds),
        })
        .collect()
}

/// One row per start date, oldest first: earliest start, latest end and the
/// summed duration of that day's sessions.
pub fn date_based_rows(sessions: &[Session]) -> Vec<ExportRow> {
    let mut days: BTreeMap<NaiveDate, (NaiveDateTime, NaiveDateTime, i64)> = BTreeMap::new();

    for session in sessions {
        days.entry(session.date())
            .and_modify(|(start, end, total)| {
                *start = (*start).min(session.start_time);
                *end = (*end).max(session.end_time);
                *total += session.duration_seconds;
            })
            .or_insert((session.start_time, session.end_time, session.duration_seconds));
    }

    days.into_iter()
        .map(|(date, (start, end, total))| ExportRow {
            date: date.format(DATE_FORMAT).to_string(),
            start: format_time(&start),
            end: format_time(&end),
            duration: format_duration(total),
        })
        .collect()
}

/// A spreadsheet cell such as `B7`, stored zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub row: u32,
    pub col: u16,
}

impl CellRef {
    /// Parses an `A1`-style reference. Column letters are case-insensitive.
    pub fn parse(reference: &str) -> Result<Self> {
        let invalid = || msg_error_anyhow!(Message::InvalidCellReference(reference.to_string()));
        let reference_trimmed = reference.trim();

        let split = reference_trimmed
            .find(|c: char| !c.is_ascii_alphabetic())
            .ok_or_else(invalid)?;
        let (letters, digits) = reference_trimmed.split_at(split);
        if letters.is_empty() || digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let mut col: u32 = 0;
        for letter in letters.chars() {
            col = col * 26 + (letter.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
            if col > MAX_COLUMN as u32 {
                return Err(invalid());
            }
        }

        let row: u32 = digits.parse().map_err(|_| invalid())?;
        if row == 0 || row > MAX_ROW {
            return Err(invalid());
        }

        Ok(CellRef {
            row: row - 1,
            col: (col - 1) as u16,
        })
    }

    /// `None` for an empty setting, which means the column is skipped.
    pub fn parse_optional(reference: &str) -> Result<Option<Self>> {
        if reference.trim().is_empty() {
            Ok(None)
        } else {
            Self::parse(reference).map(Some)
        }
    }

    /// The cell directly below.
    pub fn next(self) -> Self {
        CellRef {
            row: self.row + 1,
            col: self.col,
        }
    }
}

/// Starting cells of the four export columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellLayout {
    pub date: Option<CellRef>,
    pub start: Option<CellRef>,
    pub end: Option<CellRef>,
    pub duration: Option<CellRef>,
}

impl CellLayout {
    pub fn from_config(config: &ExportConfig) -> Result<Self> {
        let layout = CellLayout {
            date: CellRef::parse_optional(&config.date_cell)?,
            start: CellRef::parse_optional(&config.start_cell)?,
            end: CellRef::parse_optional(&config.end_cell)?,
            duration: CellRef::parse_optional(&config.duration_cell)?,
        };
        if layout.date.is_none() && layout.start.is_none() && layout.end.is_none() && layout.duration.is_none() {
            msg_bail_anyhow!(Message::InvalidCellReference(String::new()));
        }
        Ok(layout)
    }

    /// Every written cell with its value, row by row.
    pub fn cells<'a>(&self, rows: &'a [ExportRow]) -> Vec<(CellRef, &'a str)> {
        let mut columns = [self.date, self.start, self.end, self.duration];
        let mut cells = Vec::new();
        for row in rows {
            let values = [row.date.as_str(), row.start.as_str(), row.end.as_str(), row.duration.as_str()];
            for (cell, value) in columns.iter_mut().zip(values) {
                if let Some(current) = cell {
                    cells.push((*current, value));
                    *current = current.next();
                }
            }
        }
        cells
    }
}

pub struct Exporter {
    format: ExportFormat,
    output_path: PathBuf,
    overwrite: bool,
}

impl Exporter {
    pub fn new(format: ExportFormat, output_path: PathBuf) -> Self {
        Exporter {
            format,
            output_path,
            overwrite: false,
        }
    }

    /// Allows replacing an existing file at the output path.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Writes `rows` and returns how many were exported.
    pub fn export(&self, rows: &[ExportRow], config: &ExportConfig) -> Result<usize> {
        if !self.overwrite && self.output_path.exists() {
            msg_bail_anyhow!(Message::ExportTargetExists(self.output_path.display().to_string()));
        }

        match self.format {
            ExportFormat::Csv => self.write_csv(rows)?,
            ExportFormat::Excel => self.write_excel(rows, config)?,
        }
        Ok(rows.len())
    }

    fn write_csv(&self, rows: &[ExportRow]) -> Result<()> {
        let mut wtr = csv::Writer::from_path(&self.output_path)?;
        wtr.write_record(["Date", "Start", "End", "Duration"])?;

        for row in rows {
            wtr.write_record([&row.date, &row.start, &row.end, &row.duration])?;
        }

        wtr.flush()?;
        Ok(())
    }

    fn write_excel(&self, rows: &[ExportRow], config: &ExportConfig) -> Result<()> {
        let layout = CellLayout::from_config(config)?;

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(config.sheet.as_str())?;

        for (cell, value) in layout.cells(rows) {
            worksheet.write_string(cell.row, cell.col, value)?;
        }

        workbook.save(&self.output_path)?;
        Ok(())
    }
}
