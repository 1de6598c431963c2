//! `powercast` entry point.

use clap::Parser;
use powercast_cli::cli::Cli;
use powercast_cli::commands::dispatch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env = std::env::var(tracing_subscriber::EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(cli.log_filter(env.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    dispatch(cli.config.as_deref(), cli.command).await?;
    Ok(())
}
