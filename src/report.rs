use chrono::{DateTime, Local};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::checkpoint::CheckpointStore;
use crate::enrich::Enricher;
use crate::error::ReportError;
use crate::models::ShowRecord;
use crate::premieres::PremieresApi;
use crate::view::render_report;

#[derive(Debug, Clone)]
pub struct PremieresReport {
    pub html: String,
    pub start_marker: String,
    pub end_marker: String,
    pub output_path: PathBuf,
    pub new_count: usize,
    pub returning_count: usize,
}

pub struct PremieresReporter {
    title: String,
    premieres: Arc<dyn PremieresApi>,
    enricher: Enricher,
    checkpoint: CheckpointStore,
    output_dir: PathBuf,
    concurrency: usize,
}

impl PremieresReporter {
    pub fn new(
        title: impl Into<String>,
        premieres: Arc<dyn PremieresApi>,
        enricher: Enricher,
        checkpoint: CheckpointStore,
        output_dir: impl Into<PathBuf>,
        concurrency: usize,
    ) -> Self {
        Self {
            title: title.into(),
            premieres,
            enricher,
            checkpoint,
            output_dir: output_dir.into(),
            concurrency,
        }
    }

    pub async fn generate(&self, now: DateTime<Local>) -> Result<PremieresReport, ReportError> {
        let checkpoint = self.checkpoint.load(now);
        info!("Looking for premieres after '{}'", checkpoint);

        let window = self
            .premieres
            .fetch_window(&checkpoint)
            .await
            .map_err(|e| {
                error!("Error getting new premieres: {}", e);
                ReportError::Listing(e)
            })?;
        info!(
            "Found {} potentially interesting premieres ({} - {})",
            window.candidates.len(),
            window.start_marker,
            window.end_marker
        );

        let series = self
            .enricher
            .run(window.candidates, self.concurrency)
            .await?;
        if series.is_empty() {
            return Err(ReportError::NothingToReport {
                start: window.start_marker,
                end: window.end_marker,
            });
        }

        let (new_series, returning_series): (Vec<ShowRecord>, Vec<ShowRecord>) =
            series.into_iter().partition(|s| s.is_new_season);
        let html = render_report(&new_series, &returning_series)?;

        fs::create_dir_all(&self.output_dir).map_err(|source| ReportError::Write {
            path: self.output_dir.display().to_string(),
            source,
        })?;
        let output_path = self
            .output_dir
            .join(format!("{}-{}.html", self.title, now.format("%Y%m%d")));
        fs::write(&output_path, &html).map_err(|source| ReportError::Write {
            path: output_path.display().to_string(),
            source,
        })?;
        info!("Saved report to {}", output_path.display());

        if window.end_marker.is_empty() {
            warn!("Listing had no date headers; keeping previous checkpoint");
        } else if let Err(e) = self.checkpoint.save(&window.end_marker) {
            warn!(
                "Error updating last processed date in {}: {}",
                self.checkpoint.path().display(),
                e
            );
        }

        Ok(PremieresReport {
            html,
            start_marker: window.start_marker,
            end_marker: window.end_marker,
            output_path,
            new_count: new_series.len(),
            returning_count: returning_series.len(),
        })
    }
}
