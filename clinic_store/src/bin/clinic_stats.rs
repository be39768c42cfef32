use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clinic_stats::AggregationOrchestrator;
use clinic_store::SqliteConnector;
use clinic_store::config::load_app_config;
use clinic_store::db::migrate;
use shared_utils::logging::init_tracing;
use tracing::info;

#[derive(Parser)]
#[command(version, about = "Clinic statistics CLI")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Apply pending schema migrations.
    Migrate {
        #[arg(long, value_name = "FILE")]
        config: PathBuf,
    },
    /// Build the statistics report and print it as JSON.
    Report {
        #[arg(long, value_name = "FILE")]
        config: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("info");
    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Migrate { config } => {
            let cfg = load_app_config(&config)?;
            let url = cfg.database.url()?;
            let applied = migrate::run_sqlite(url).with_context(|| format!("migrate {url}"))?;
            info!(applied, "database up to date");
        }
        Cmd::Report { config, pretty } => {
            let cfg = load_app_config(&config)?;
            let connector = SqliteConnector::from_config(&cfg.database)?;
            let orchestrator = AggregationOrchestrator::new(connector, cfg.stats);

            let report = orchestrator.build_report().await?;
            let json = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{json}");
        }
    }

    Ok(())
}
