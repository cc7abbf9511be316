mod monitor;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dropwatch")]
#[command(about = "Storefront drop monitor: detects new products and restocks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Poll the configured categories on an interval, recording new
    /// products and variant restocks to the local store
    Monitor {
        /// Run a single cycle over all categories, then exit
        #[arg(long)]
        once: bool,

        /// Restrict monitoring to a single category
        #[arg(long)]
        category: Option<String>,
    },
    /// Print the products currently known to the store
    Products,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = dropwatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Monitor { once, category } => {
            monitor::run_monitor(&config, once, category).await
        }
        Commands::Products => monitor::run_products(&config),
    }
}
