use anyhow::Result;
use chrono::Local;
use clap::Parser;
use dotenvy::dotenv;
use showscout::catalog::{CatalogApi, CatalogClient};
use showscout::checkpoint::CheckpointStore;
use showscout::config::{Cli, Config};
use showscout::enrich::Enricher;
use showscout::error::ReportError;
use showscout::premieres::{PremieresApi, PremieresClient};
use showscout::report::PremieresReporter;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_file = dotenv();
    init_tracing();
    match env_file {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => warn!("No .env file loaded ({}) - relying on environment", e),
    }

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    let concurrency = cli.concurrency.unwrap_or(config.concurrency);
    info!(
        "Using {} main genres, concurrency {}",
        config.main_genres.len(),
        concurrency
    );

    let premieres: Arc<dyn PremieresApi> = Arc::new(PremieresClient::with_url(
        &config.sources.premieres_url,
        config.main_genres.clone(),
    )?);
    let catalog: Arc<dyn CatalogApi> =
        Arc::new(CatalogClient::with_base_url(&config.sources.catalog_base_url)?);
    let enricher = Enricher::new(catalog).with_sub_genres(config.sub_genre_filter());

    let reporter = PremieresReporter::new(
        config.title.clone(),
        premieres,
        enricher,
        CheckpointStore::in_dir(&cli.last_processed_path),
        cli.output.clone(),
        concurrency,
    );

    match reporter.generate(Local::now()).await {
        Ok(report) => {
            info!(
                "Report for {} - {}: {} new, {} returning series ({})",
                report.start_marker,
                report.end_marker,
                report.new_count,
                report.returning_count,
                report.output_path.display()
            );
            Ok(())
        }
        Err(ReportError::NothingToReport { start, end }) => {
            info!("Nothing to report between '{}' and '{}'", start, end);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
