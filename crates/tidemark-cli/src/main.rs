use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod scan;
mod status;

use scan::ScanArgs;

#[derive(Debug, Parser)]
#[command(name = "tidemark-cli")]
#[command(about = "Tidemark market intelligence scanner")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Report whether the search and model credentials are configured
    Status,
    /// Run one market scan and print the report as JSON
    Scan(ScanArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = tidemark_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Status) => status::run_status(&config)?,
        Some(Commands::Scan(args)) => scan::run_scan(&config, args).await?,
        None => println!("tidemark-cli: use `status` or `scan` (see --help)"),
    }

    Ok(())
}
