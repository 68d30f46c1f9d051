pub mod export;
pub mod init;
pub mod reset;
pub mod sessions;
pub mod watch;

use crate::libs::messages::Message;
use crate::msg_error_anyhow;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Track work sessions in the foreground")]
    Watch(watch::WatchArgs),
    #[command(about = "Display sessions for a given date")]
    Sessions(sessions::SessionsArgs),
    #[command(about = "Export sessions to CSV or Excel")]
    Export(export::ExportArgs),
    #[command(about = "Delete every stored session")]
    Reset(reset::ResetArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Watch(args) => watch::cmd(args).await,
            Commands::Sessions(args) => sessions::cmd(args),
            Commands::Export(args) => export::cmd(args),
            Commands::Reset(args) => reset::cmd(args),
        }
    }
}

/// Parses `today` (any case) or a `YYYY-MM-DD` date.
pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    if date_str.eq_ignore_ascii_case("today") {
        Ok(Local::now().date_naive())
    } else {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| msg_error_anyhow!(Message::InvalidDate(date_str.to_string())))
    }
}
