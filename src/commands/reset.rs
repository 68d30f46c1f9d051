use crate::db::sessions::Sessions;
use crate::libs::messages::Message;
use crate::{msg_info, msg_success};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct ResetArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

/// Deletes every stored session after confirmation.
pub fn cmd(args: ResetArgs) -> Result<()> {
    let mut sessions = Sessions::new()?;
    let count = sessions.count()?;
    if count == 0 {
        msg_info!(Message::NothingToReset);
        return Ok(());
    }

    if !args.yes
        && !Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmReset(count).to_string())
            .default(false)
            .interact()?
    {
        msg_info!(Message::ResetCancelled);
        return Ok(());
    }

    let deleted = sessions.delete_all()?;
    msg_success!(Message::ResetCompleted(deleted));
    Ok(())
}
