use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use repub_client::ReqwestFetcher;
use repub_core::{AppConfig, RepublishService};

#[derive(Parser)]
#[command(name = "repub", version, about = "Classified-ad republisher")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the ids of all currently published ads
    List,

    /// Count the currently published ads
    Count,

    /// Discover all published ads and republish each of them
    Run {
        /// Start even if another process claims to be running
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// Republish only the given ad ids, skipping discovery
    Republish {
        /// Ad ids to republish
        #[arg(long, required = true, num_args = 1..)]
        ids: Vec<String>,

        /// Start even if another process claims to be running
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Logs on stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("repub=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = AppConfig::from_env()?;
    let fetcher = ReqwestFetcher::new(&config.site, &config.headers)?;
    let service = RepublishService::new(fetcher, config);

    match cli.command {
        Commands::List => {
            let ad_ids = service.list_published_ad_ids().await?;
            tracing::info!(count = ad_ids.len(), "Discovery complete");
            println!("{}", serde_json::to_string_pretty(&ad_ids)?);
        }
        Commands::Count => {
            let count = service.count_published_ads().await?;
            println!("{count}");
        }
        Commands::Run { force } => {
            let report = service.run_republish_all(force).await?;
            tracing::info!(
                process_id = %report.process_id,
                requests_sent = report.stats.requests_sent,
                "Run complete"
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Republish { ids, force } => {
            let report = service.run_republish_specific(&ids, force).await?;
            tracing::info!(
                process_id = %report.process_id,
                requests_sent = report.stats.requests_sent,
                "Run complete"
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
