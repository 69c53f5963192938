use anyhow::Result;
use clap::Parser;

use pricewatch::application::{Cli, CommandExecutor};
use pricewatch::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let cli = Cli::parse();

    // Load configuration from file if provided, defaults otherwise
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };

    CommandExecutor::execute(cli.command, config, cli.destination).await?;
    Ok(())
}
