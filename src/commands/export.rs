//! Session export command.
//!
//! Writes stored sessions to a CSV file or an Excel workbook. Rows are
//! grouped per day unless `--flat` is given or the configuration turns
//! date-based export off. Excel output follows the cell layout configured with
//! `worklog init`.
//!
//! The writers always produce a fresh file, so an existing target is only
//! replaced after confirmation or with `--force`.

use crate::{
    db::sessions::Sessions,
    libs::{
        config::Config,
        export::{date_based_rows, flat_rows, ExportFormat, Exporter},
        messages::Message,
    },
    msg_bail_anyhow, msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "excel")]
    format: ExportFormat,

    /// Output file path
    ///
    /// Defaults to the export file from the configuration for Excel output.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// One row per session instead of one row per day
    #[arg(long)]
    flat: bool,

    /// Replace an existing output file without asking
    #[arg(long)]
    force: bool,
}

pub fn cmd(args: ExportArgs) -> Result<()> {
    let export_config = Config::read()?.export.unwrap_or_default();

    let output = match args.output {
        Some(path) => path,
        None if args.format == ExportFormat::Excel && !export_config.excel_path.trim().is_empty() => {
            PathBuf::from(export_config.excel_path.trim())
        }
        None => msg_bail_anyhow!(Message::ExportPathMissing),
    };

    let sessions = Sessions::new()?.fetch_all()?;
    if sessions.is_empty() {
        msg_info!(Message::NothingToExport);
        return Ok(());
    }

    let rows = if args.flat || !export_config.date_based {
        flat_rows(&sessions)
    } else {
        date_based_rows(&sessions)
    };

    let exists = output.exists();
    if exists
        && !args.force
        && !Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmOverwrite(output.display().to_string()).to_string())
            .default(false)
            .interact()?
    {
        msg_info!(Message::ExportCancelled);
        return Ok(());
    }

    let exporter = Exporter::new(args.format, output).overwrite(exists);
    let count = exporter.export(&rows, &export_config)?;

    msg_success!(Message::ExportCompleted {
        rows: count,
        path: exporter.output_path().display().to_string(),
    });
    Ok(())
}
