use clap::Parser;
use site_panels::cli::args::Args;
use site_panels::commands;
use site_panels::config::Config;
use site_panels::infrastructure::logging::setup_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = Config::new();

    config.update_from_args(&args);
    setup_logging(config.logging_config()?)?;
    config.validate()?;

    tracing::debug!(strategy = %config.strategy, layout = ?config.layout_path, "configuration loaded");

    let output = commands::route_command(&args, &config).await?;
    println!("{}", output);
    Ok(())
}
