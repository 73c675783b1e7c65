//! Notewatch binary entry point

use clap::Parser;
use notewatch_daemon::{Cli, DaemonConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = DaemonConfig::from_cli(cli)?;

    notewatch_daemon::run(config).await?;
    Ok(())
}
