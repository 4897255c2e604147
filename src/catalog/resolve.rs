use once_cell::sync::Lazy;
use reqwest::Url;
use scraper::{Html, Selector};
use tracing::debug;

use super::client::CatalogClient;
use super::text::fuzzify;
use crate::error::LookupError;
use crate::utils::{element_text, selector};

static RESULT_ROW: Lazy<Selector> = Lazy::new(|| selector("table.findList tr"));
static RESULT_TEXT: Lazy<Selector> = Lazy::new(|| selector(".result_text"));
static RESULT_LINK: Lazy<Selector> = Lazy::new(|| selector("a[href]"));

const SERIES_TYPES: [&str; 2] = ["TV Series", "TV Mini-Series"];

/// One parsed row of the catalog search page.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchCandidate {
    pub title: String,
    pub year: String,
    pub kind: String,
    pub dedup_number: Option<String>,
    pub link: String,
}

impl CatalogClient {
    pub(crate) async fn search_series(&self, title: &str) -> Result<String, LookupError> {
        let url = self.search_url(title);
        let body = self.get_html(&url).await?;
        let candidates = parse_search_results(&body);
        debug!(
            title = %title,
            rows = candidates.len(),
            "Parsed catalog search results"
        );
        let best = pick_series(title, &candidates)
            .ok_or_else(|| LookupError::NotFound(title.to_string()))?;
        debug!(
            title = %title,
            year = %best.year,
            kind = %best.kind,
            dedup = ?best.dedup_number,
            "Picked catalog series"
        );
        absolute_link(self.base_url(), &best.link)
    }
}

pub(crate) fn parse_search_results(body: &str) -> Vec<SearchCandidate> {
    let doc = Html::parse_document(body);
    doc.select(&RESULT_ROW)
        .filter_map(|row| {
            let result = row.select(&RESULT_TEXT).next()?;
            let link = result
                .select(&RESULT_LINK)
                .next()
                .and_then(|a| a.value().attr("href"))?;
            parse_search_label(&element_text(&result), link)
        })
        .collect()
}

/// Split a raw result label such as `"Sanctuary (I) (2019) (TV Series)"` on `(`.
/// Three segments carry `{year, type}`, four carry `{dedup, year, type}`; any other
/// shape is not a series entry.
pub(crate) fn parse_search_label(label: &str, link: &str) -> Option<SearchCandidate> {
    let segments: Vec<&str> = label.split('(').collect();
    let clean = |s: &str| {
        s.trim_matches(|c: char| c == ')' || c.is_whitespace())
            .to_string()
    };
    let (dedup_number, year, kind) = match segments.as_slice() {
        [_, year, kind] => (None, clean(year), clean(kind)),
        [_, dedup, year, kind] => (Some(clean(dedup)), clean(year), clean(kind)),
        _ => return None,
    };
    Some(SearchCandidate {
        title: segments[0].trim().to_string(),
        year,
        kind,
        dedup_number,
        link: link.to_string(),
    })
}

fn is_series(kind: &str) -> bool {
    SERIES_TYPES.iter().any(|t| kind.starts_with(t))
}

/// Exact fuzzified title match restricted to series, most recent year first.
///
/// Years are compared as strings, which orders same-width numeric years correctly
/// but not ranges like `"2010-2015"` against `"2019"`.
pub(crate) fn pick_series<'a>(
    query: &str,
    candidates: &'a [SearchCandidate],
) -> Option<&'a SearchCandidate> {
    let query_key = fuzzify(query.trim());
    let mut best: Option<&SearchCandidate> = None;
    for candidate in candidates {
        if fuzzify(&candidate.title) != query_key || !is_series(&candidate.kind) {
            continue;
        }
        best = match best {
            Some(current) if current.year >= candidate.year => Some(current),
            _ => Some(candidate),
        };
    }
    best
}

fn absolute_link(base_url: &str, link: &str) -> Result<String, LookupError> {
    Url::parse(base_url)
        .and_then(|base| base.join(link))
        .map(String::from)
        .map_err(|e| LookupError::Parse(format!("invalid result link '{link}': {e}")))
}
