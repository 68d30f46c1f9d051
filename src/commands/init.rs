//! Configuration wizard command.
//!
//! Walks the user through the tracker and export settings and writes them to
//! `config.json` in the application data directory.

use crate::{
    libs::{config::Config, messages::Message},
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Remove the existing configuration instead of creating a new one
    #[arg(short, long)]
    delete: bool,
}

pub fn cmd(init_args: InitArgs) -> Result<()> {
    if init_args.delete {
        if Config::delete()? {
            msg_success!(Message::ConfigDeleted);
        } else {
            msg_info!(Message::ConfigNotFound);
        }
        return Ok(());
    }

    // Prompts are pre-filled with the current values
    Config::init()?.save()?;

    msg_success!(Message::ConfigSaved);
    Ok(())
}
