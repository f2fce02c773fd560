mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use sani_config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    match cli.command {
        cli::Commands::Init { force } => commands::init::handle(&config_path, force),
        cli::Commands::Completions { shell } => commands::completions::handle(shell),
        cli::Commands::Serve { host, port } => {
            commands::serve::handle(Config::load_from(&config_path)?, host, port).await
        }
        cli::Commands::Analyze {
            file,
            content_type,
            service,
            json,
        } => {
            let config = Config::load_from(&config_path)?;
            commands::analyze::handle(&config, &file, content_type, service, json).await
        }
        cli::Commands::Process {
            image,
            method,
            output,
        } => {
            let config = Config::load_from(&config_path)?;
            commands::process::handle(&config, &image, method, output).await
        }
    }
}
