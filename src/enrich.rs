use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::catalog::CatalogApi;
use crate::error::{EnrichError, LookupError};
use crate::models::{Candidate, ShowRecord};
use crate::score::score;

pub const DEFAULT_CONCURRENCY: usize = 5;
pub const NEW_SERIES_FLOOR: u32 = 20;
pub const RETURNING_SERIES_FLOOR: u32 = 40;

/// Minimum score a record needs to be reported.
pub fn score_floor(is_new_season: bool) -> u32 {
    if is_new_season {
        NEW_SERIES_FLOOR
    } else {
        RETURNING_SERIES_FLOOR
    }
}

/// Optional secondary filter on catalog genres. Disabled when both lists are empty.
#[derive(Debug, Clone, Default)]
pub struct SubGenreFilter {
    fuzzy: Vec<String>,
    exact: Vec<String>,
}

impl SubGenreFilter {
    pub fn new(fuzzy: Vec<String>, exact: Vec<String>) -> Self {
        Self {
            fuzzy: fuzzy.into_iter().map(|f| f.to_lowercase()).collect(),
            exact,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.fuzzy.is_empty() || !self.exact.is_empty()
    }

    pub fn accepts(&self, genres: &[String]) -> bool {
        if !self.is_enabled() {
            return true;
        }
        genres.iter().any(|genre| {
            let lower = genre.to_lowercase();
            self.exact.contains(genre) || self.fuzzy.iter().any(|f| lower.contains(f.as_str()))
        })
    }
}

struct Outcome {
    title: String,
    result: Result<ShowRecord, LookupError>,
}

#[derive(Clone)]
pub struct Enricher {
    catalog: Arc<dyn CatalogApi>,
    sub_genres: Arc<SubGenreFilter>,
}

impl Enricher {
    pub fn new(catalog: Arc<dyn CatalogApi>) -> Self {
        Self {
            catalog,
            sub_genres: Arc::new(SubGenreFilter::default()),
        }
    }

    pub fn with_sub_genres(mut self, filter: SubGenreFilter) -> Self {
        self.sub_genres = Arc::new(filter);
        self
    }

    /// Resolve, fetch and score every candidate on a fixed pool of `concurrency`
    /// workers, returning the surviving records by descending score (title breaks ties).
    ///
    /// Per-candidate failures are logged and skipped; only an empty pool is an error.
    pub async fn run(
        &self,
        candidates: Vec<Candidate>,
        concurrency: usize,
    ) -> Result<Vec<ShowRecord>, EnrichError> {
        if concurrency == 0 {
            return Err(EnrichError::InvalidConcurrency(concurrency));
        }

        let total = candidates.len();
        info!(
            "Enriching {} candidates (concurrency={})",
            total, concurrency
        );

        let queue = Arc::new(Mutex::new(VecDeque::from(candidates)));
        let (result_tx, mut result_rx) = mpsc::unbounded_channel::<Outcome>();
        let mut workers = JoinSet::new();

        for _ in 0..concurrency {
            let queue = queue.clone();
            let result_tx = result_tx.clone();
            let catalog = self.catalog.clone();
            let sub_genres = self.sub_genres.clone();
            workers.spawn(async move {
                loop {
                    let next = queue.lock().await.pop_front();
                    let Some(candidate) = next else {
                        break;
                    };
                    let result =
                        process_candidate(catalog.as_ref(), &sub_genres, &candidate).await;
                    let outcome = Outcome {
                        title: candidate.title,
                        result,
                    };
                    if result_tx.send(outcome).is_err() {
                        break;
                    }
                }
            });
        }
        // Workers hold the remaining senders; the loop below ends when they all finish.
        drop(result_tx);

        let mut series = Vec::new();
        while let Some(Outcome { title, result }) = result_rx.recv().await {
            match result {
                Ok(show) => {
                    debug!(title = %title, score = show.score, "Found interesting series");
                    series.push(show);
                }
                Err(e @ LookupError::NotFound(_)) => {
                    info!(title = %title, "No catalog match: {}", e);
                }
                Err(e) if e.is_expected() => {
                    info!(title = %title, "Series was filtered out: {}", e);
                }
                Err(e) => {
                    error!(title = %title, "Error looking up series data: {}", e);
                }
            }
        }

        while let Some(res) = workers.join_next().await {
            if let Err(e) = res {
                error!("Enrichment worker panicked: {}", e);
            }
        }

        series.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.title.cmp(&b.title))
        });
        info!("Kept {} of {} candidates", series.len(), total);
        Ok(series)
    }
}

async fn process_candidate(
    catalog: &dyn CatalogApi,
    sub_genres: &SubGenreFilter,
    candidate: &Candidate,
) -> Result<ShowRecord, LookupError> {
    let link = catalog.resolve(&candidate.title).await?;
    let mut show = catalog.fetch(&link).await?;

    show.score = score(&show.average_rating, show.rating_count);
    let floor = score_floor(candidate.is_new_season);
    if show.score < floor {
        return Err(LookupError::ScoreTooLow {
            title: candidate.title.clone(),
            score: show.score,
            floor,
        });
    }
    if !sub_genres.accepts(&show.genres) {
        return Err(LookupError::SubGenreMismatch(candidate.title.clone()));
    }

    show.is_new_season = candidate.is_new_season;
    show.streaming_service = candidate.streaming_service;
    Ok(show)
}
