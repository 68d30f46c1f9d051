use tracing_subscriber::EnvFilter;
use worklog::commands::Cli;
use worklog::libs::messages::macros::is_debug_mode;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if is_debug_mode() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("worklog=debug")))
            .init();
    }

    Cli::menu().await
}
