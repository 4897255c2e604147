use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::debug;

use crate::error::LookupError;
use crate::models::{Candidate, PremiereWindow, StreamingService};
use crate::utils::{child_elements, element_text, get_html, http_client, selector};

pub const PREMIERES_URL: &str = "https://www.metacritic.com/feature/tv-premiere-dates?page=1";

static LIST_ROW: Lazy<Selector> = Lazy::new(|| selector(".listtable tr"));
static HEADER_CELL: Lazy<Selector> = Lazy::new(|| selector("th"));
static TITLE_CELL: Lazy<Selector> = Lazy::new(|| selector("td.title"));
static TITLE_LINK: Lazy<Selector> = Lazy::new(|| selector("td.title a"));
static TITLE_ICON: Lazy<Selector> = Lazy::new(|| selector("td.title img[alt]"));
static ICON: Lazy<Selector> = Lazy::new(|| selector("img[alt]"));

const DATE_HEADER_CLASS: &str = "sublistbig";
const SHOW_ROW_CLASS: &str = "even";
const GENRE_COLUMN: usize = 2;
const NETWORK_COLUMN: usize = 3;

const MOVIE_LINK_MARKER: &str = "movie";
const MOVIE_ICON: &str = "MOVIE";
const NEW_SERIES_ICONS: [&str; 2] = ["NEW", "LIMITED"];

/// Promo annotations appended to listing titles.
const TITLE_NOISE: [&str; 5] = [
    "Trailer2",
    "Trailer",
    "Opening scene",
    "Full 1st episode",
    "Red-band trailer",
];

const PROVIDERS: &[(&str, StreamingService)] = &[
    ("Netflix", StreamingService::Netflix),
    ("Prime Video", StreamingService::AmazonPrime),
    ("Amazon Prime Video", StreamingService::AmazonPrime),
    ("Amazon Prime", StreamingService::AmazonPrime),
    ("Disney+", StreamingService::DisneyPlus),
    ("Disney Plus", StreamingService::DisneyPlus),
];

#[async_trait]
pub trait PremieresApi: Send + Sync {
    /// Listing candidates newer than `checkpoint` (exclusive).
    async fn fetch_window(&self, checkpoint: &str) -> Result<PremiereWindow, LookupError>;
}

#[derive(Debug, Clone)]
pub struct PremieresClient {
    client: Client,
    url: String,
    main_genres: Vec<String>,
}

impl PremieresClient {
    pub fn new(main_genres: Vec<String>) -> Result<Self> {
        Self::with_url(PREMIERES_URL, main_genres)
    }

    pub fn with_url(url: &str, main_genres: Vec<String>) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            url: url.to_string(),
            main_genres,
        })
    }
}

#[async_trait]
impl PremieresApi for PremieresClient {
    async fn fetch_window(&self, checkpoint: &str) -> Result<PremiereWindow, LookupError> {
        let body = get_html(&self.client, &self.url).await?;
        let window = parse_window(&body, checkpoint, &self.main_genres);
        debug!(
            start = %window.start_marker,
            end = %window.end_marker,
            candidates = window.candidates.len(),
            "Scanned premieres listing"
        );
        Ok(window)
    }
}

/// Walk the listing newest-first, stopping at the date header equal to `checkpoint`.
pub fn parse_window(body: &str, checkpoint: &str, main_genres: &[String]) -> PremiereWindow {
    let doc = Html::parse_document(body);
    let checkpoint_key = checkpoint.trim().to_lowercase();

    let mut end_marker: Option<String> = None;
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for row in doc.select(&LIST_ROW) {
        if has_class(&row, DATE_HEADER_CLASS) {
            let Some(date) = row.select(&HEADER_CELL).next().map(|th| header_date(&th)) else {
                continue;
            };
            if end_marker.is_none() {
                end_marker = Some(date.clone());
            }
            if date.to_lowercase() == checkpoint_key {
                break;
            }
            continue;
        }

        if !has_class(&row, SHOW_ROW_CLASS) {
            // movie/VOD rows and editorial notes
            continue;
        }

        let Some(candidate) = parse_show_row(&row, main_genres, &seen) else {
            continue;
        };
        seen.insert(candidate.title.clone());
        candidates.push(candidate);
    }

    PremiereWindow {
        start_marker: checkpoint.to_string(),
        end_marker: end_marker.unwrap_or_default(),
        candidates,
    }
}

fn parse_show_row(
    row: &ElementRef<'_>,
    main_genres: &[String],
    seen: &HashSet<String>,
) -> Option<Candidate> {
    if is_movie(row) {
        return None;
    }

    let title = row
        .select(&TITLE_CELL)
        .next()
        .map(|cell| clean_title(&element_text(&cell)))
        .unwrap_or_default();
    if title.is_empty() || seen.contains(&title) {
        return None;
    }

    let is_new_season = row
        .select(&TITLE_ICON)
        .filter_map(|img| img.value().attr("alt"))
        .any(|alt| NEW_SERIES_ICONS.contains(&alt));

    let cells = child_elements(row);
    let genres = cells
        .get(GENRE_COLUMN)
        .map(|cell| split_genres(&element_text(cell)))
        .unwrap_or_default();
    if !is_interesting_genre(&genres, main_genres) {
        return None;
    }

    let streaming_service = cells
        .get(NETWORK_COLUMN)
        .map(detect_streaming_service)
        .unwrap_or_default();

    Some(Candidate {
        title,
        is_new_season,
        genres,
        streaming_service,
    })
}

fn has_class(el: &ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

fn header_date(th: &ElementRef<'_>) -> String {
    // "Monday / April 20" -> "April 20"
    let raw = element_text(th);
    raw.rsplit(" / ").next().unwrap_or(&raw).trim().to_string()
}

fn is_movie(row: &ElementRef<'_>) -> bool {
    let movie_link = row
        .select(&TITLE_LINK)
        .next()
        .and_then(|a| a.value().attr("href"))
        .is_some_and(|href| href.contains(MOVIE_LINK_MARKER));
    movie_link
        || row
            .select(&TITLE_ICON)
            .any(|img| img.value().attr("alt") == Some(MOVIE_ICON))
}

/// Drop trailing promo annotations (possibly several) and collapse whitespace.
pub(crate) fn clean_title(raw: &str) -> String {
    let mut title = raw.trim_end();
    while let Some(stripped) = TITLE_NOISE
        .iter()
        .find_map(|noise| title.strip_suffix(noise))
    {
        title = stripped.trim_end();
    }
    title.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn split_genres(raw: &str) -> Vec<String> {
    raw.split('/')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

/// True when any genre token exactly equals an allow-listed main genre.
pub fn is_interesting_genre(genres: &[String], main_genres: &[String]) -> bool {
    genres.iter().any(|g| main_genres.contains(g))
}

fn detect_streaming_service(cell: &ElementRef<'_>) -> StreamingService {
    let text = element_text(cell);
    let text = text.trim();
    let alts: Vec<&str> = cell
        .select(&ICON)
        .filter_map(|img| img.value().attr("alt"))
        .collect();
    PROVIDERS
        .iter()
        .find(|(name, _)| {
            text.eq_ignore_ascii_case(name) || alts.iter().any(|a| a.eq_ignore_ascii_case(name))
        })
        .map(|(_, service)| *service)
        .unwrap_or_default()
}
