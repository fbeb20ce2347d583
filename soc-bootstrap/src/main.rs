use anyhow::Result;
use clap::{Parser, Subcommand};

use soc_bootstrap::context::AppContext;
use soc_bootstrap::{analyze_once, logging, run_standalone};
use soc_infrastructure::{AppConfig, CONFIG_ENV};

#[derive(Parser, Debug)]
#[command(name = "soc-analyzer")]
#[command(about = "Sign-in anomaly detection and user risk scoring", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Analyze the stored snapshot once and print the report
    Analyze {
        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(config) = &args.config {
        std::env::set_var(CONFIG_ENV, config);
    }

    let config = AppConfig::load().await?;
    let _log_guard = logging::init(config.log_dir.as_deref());
    let context = AppContext::from_config(config).await?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => run_standalone(context).await,
        Command::Analyze { pretty } => analyze_once(context, pretty).await,
    }
}
