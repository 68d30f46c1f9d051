use crate::libs::daemon;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Wait for a 'start' command instead of starting a session right away
    #[arg(long)]
    no_start: bool,
}

// Runs the tracking engine until Ctrl+C, 'quit' or the end of the login session.
pub async fn cmd(args: WatchArgs) -> Result<()> {
    daemon::run_with_signal_handling(!args.no_start).await
}
