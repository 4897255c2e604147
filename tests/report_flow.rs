use chrono::{Local, TimeZone};
use showscout::catalog::CatalogApi;
use showscout::checkpoint::CheckpointStore;
use showscout::enrich::Enricher;
use showscout::error::{LookupError, ReportError};
use showscout::models::{Candidate, PremiereWindow, ShowRecord, StreamingService};
use showscout::premieres::PremieresApi;
use showscout::report::PremieresReporter;
use std::sync::{Arc, Mutex};

struct FakePremieres {
    window: Result<PremiereWindow, LookupError>,
    seen_checkpoints: Mutex<Vec<String>>,
}

impl FakePremieres {
    fn new(window: Result<PremiereWindow, LookupError>) -> Self {
        Self {
            window,
            seen_checkpoints: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl PremieresApi for FakePremieres {
    async fn fetch_window(&self, checkpoint: &str) -> Result<PremiereWindow, LookupError> {
        self.seen_checkpoints
            .lock()
            .unwrap()
            .push(checkpoint.to_string());
        self.window.clone().map(|mut w| {
            w.start_marker = checkpoint.to_string();
            w
        })
    }
}

/// Every title resolves and rates 8.0 with 100k votes (score 86).
struct GenerousCatalog;

#[async_trait::async_trait]
impl CatalogApi for GenerousCatalog {
    async fn resolve(&self, title: &str) -> Result<String, LookupError> {
        Ok(format!("https://catalog.test/{title}"))
    }

    async fn fetch(&self, canonical_link: &str) -> Result<ShowRecord, LookupError> {
        let title = canonical_link.rsplit('/').next().unwrap_or_default();
        Ok(ShowRecord {
            title: title.to_string(),
            canonical_link: canonical_link.to_string(),
            image: String::new(),
            genres: vec!["Drama".to_string()],
            average_rating: "8.0".to_string(),
            rating_count: 100_000,
            description: String::new(),
            score: 0,
            is_new_season: false,
            streaming_service: StreamingService::None,
        })
    }
}

fn candidate(title: &str, is_new: bool) -> Candidate {
    Candidate {
        title: title.to_string(),
        is_new_season: is_new,
        genres: vec!["Drama".to_string()],
        streaming_service: StreamingService::None,
    }
}

fn window(end: &str, candidates: Vec<Candidate>) -> PremiereWindow {
    PremiereWindow {
        start_marker: String::new(),
        end_marker: end.to_string(),
        candidates,
    }
}

fn reporter(
    premieres: Arc<FakePremieres>,
    checkpoint: CheckpointStore,
    out: &std::path::Path,
) -> PremieresReporter {
    PremieresReporter::new(
        "tv",
        premieres,
        Enricher::new(Arc::new(GenerousCatalog)),
        checkpoint,
        out,
        2,
    )
}

#[tokio::test]
async fn first_run_starts_one_week_back() {
    let state = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let premieres = Arc::new(FakePremieres::new(Ok(window(
        "April 24",
        vec![candidate("Alpha", true), candidate("Beta", false)],
    ))));
    let checkpoint = CheckpointStore::in_dir(state.path());
    let reporter = reporter(premieres.clone(), checkpoint.clone(), out.path());

    let now = Local.with_ymd_and_hms(2020, 4, 25, 8, 0, 0).unwrap();
    let report = reporter.generate(now).await.unwrap();

    assert_eq!(*premieres.seen_checkpoints.lock().unwrap(), vec!["April 18"]);
    assert_eq!(report.start_marker, "April 18");
    assert_eq!(report.new_count, 1);
    assert_eq!(report.returning_count, 1);
    assert!(report.output_path.ends_with("tv-20200425.html"));
    assert_eq!(checkpoint.load(now), "April 24");
}

#[tokio::test]
async fn listing_failure_leaves_checkpoint_untouched() {
    let state = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let checkpoint = CheckpointStore::in_dir(state.path());
    checkpoint.save("April 20").unwrap();
    let premieres = Arc::new(FakePremieres::new(Err(LookupError::Transport {
        url: "https://listing.test".to_string(),
        reason: "status 502".to_string(),
    })));
    let reporter = reporter(premieres, checkpoint.clone(), out.path());

    let now = Local.with_ymd_and_hms(2020, 4, 25, 8, 0, 0).unwrap();
    let err = reporter.generate(now).await.unwrap_err();

    assert!(matches!(err, ReportError::Listing(LookupError::Transport { .. })));
    assert_eq!(checkpoint.load(now), "April 20");
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn empty_window_reports_nothing() {
    let state = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let checkpoint = CheckpointStore::in_dir(state.path());
    checkpoint.save("April 24").unwrap();
    let premieres = Arc::new(FakePremieres::new(Ok(window("April 24", Vec::new()))));
    let reporter = reporter(premieres, checkpoint.clone(), out.path());

    let now = Local.with_ymd_and_hms(2020, 4, 25, 8, 0, 0).unwrap();
    match reporter.generate(now).await.unwrap_err() {
        ReportError::NothingToReport { start, end } => {
            assert_eq!(start, "April 24");
            assert_eq!(end, "April 24");
        }
        other => panic!("expected nothing to report, got {other:?}"),
    }
}

#[tokio::test]
async fn blank_end_marker_is_not_persisted() {
    let state = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let checkpoint = CheckpointStore::in_dir(state.path());
    checkpoint.save("April 20").unwrap();
    let premieres = Arc::new(FakePremieres::new(Ok(window(
        "",
        vec![candidate("Alpha", false)],
    ))));
    let reporter = reporter(premieres, checkpoint.clone(), out.path());

    let now = Local.with_ymd_and_hms(2020, 4, 25, 8, 0, 0).unwrap();
    let report = reporter.generate(now).await.unwrap();

    assert_eq!(report.returning_count, 1);
    assert_eq!(checkpoint.load(now), "April 20");
}

#[tokio::test]
async fn unwritable_checkpoint_still_produces_report() {
    let state = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let checkpoint = CheckpointStore::in_dir(state.path().join("missing-dir"));
    let premieres = Arc::new(FakePremieres::new(Ok(window(
        "April 24",
        vec![candidate("Alpha", true)],
    ))));
    let reporter = reporter(premieres, checkpoint.clone(), out.path());

    let now = Local.with_ymd_and_hms(2020, 4, 25, 8, 0, 0).unwrap();
    let report = reporter.generate(now).await.unwrap();

    assert_eq!(report.new_count, 1);
    assert!(report.output_path.exists());
    assert!(!checkpoint.path().exists());
    // nothing persisted, so the next run still starts one week back
    assert_eq!(checkpoint.load(now), "April 18");
}
