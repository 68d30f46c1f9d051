//! Display recorded sessions command.
//!
//! Prints every session that started on the given date in a table, followed
//! by the day's total.

use super::parse_date;
use crate::db::sessions::Sessions;
use crate::libs::formatter::format_duration;
use crate::libs::messages::Message;
use crate::libs::session::SessionStore;
use crate::libs::view::View;
use crate::{msg_info, msg_print};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct SessionsArgs {
    /// Date to show sessions for
    ///
    /// Accepts `today` or a date in `YYYY-MM-DD` format.
    #[arg(long, short, default_value = "today", help = "Date to show sessions for (YYYY-MM-DD or 'today')")]
    date: String,
}

pub fn cmd(args: SessionsArgs) -> Result<()> {
    let date = parse_date(&args.date)?;
    let sessions = Sessions::new()?.query_by_date(date)?;

    if sessions.is_empty() {
        msg_info!(Message::NoSessionsForDate(date.format("%B %-d, %Y").to_string()));
        return Ok(());
    }

    msg_print!(Message::SessionsHeader(date.format("%B %-d, %Y").to_string()), true);
    View::sessions(&sessions)?;

    let total: i64 = sessions.iter().map(|s| s.duration_seconds).sum();
    msg_print!(Message::SessionsTotal(format_duration(total)));

    Ok(())
}
