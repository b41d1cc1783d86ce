use anyhow::Result;
use clap::Parser;
use devscout_rs::cli::{self, Command};
use devscout_rs::{chat, pipeline};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = cli::Args::parse();
    let command = args.command.clone();
    let config = args.into_config()?;

    let default_directive = if config.verbose {
        "devscout_rs=debug"
    } else {
        "devscout_rs=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_writer(std::io::stderr)
        .init();

    match command {
        Command::Research {
            query,
            output,
            format,
        } => pipeline::launch(&config, &query.join(" "), output, format).await,
        Command::Chat => chat::launch(&config).await,
    }
}
