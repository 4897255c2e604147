use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::Deserialize;

use super::client::CatalogClient;
use super::text::unescape_html;
use crate::error::LookupError;
use crate::models::{ShowRecord, StreamingService};
use crate::utils::{element_text, selector};

static STRUCTURED_DATA: Lazy<Selector> =
    Lazy::new(|| selector(r#"script[type="application/ld+json"]"#));

#[derive(Debug, Deserialize)]
struct LdShow {
    name: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    genre: Option<GenreField>,
    #[serde(rename = "aggregateRating", default)]
    aggregate_rating: Option<LdRating>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenreField {
    Single(String),
    Many(Vec<String>),
}

impl GenreField {
    fn into_list(self) -> Vec<String> {
        let list = match self {
            GenreField::Single(g) => vec![g],
            GenreField::Many(list) => list,
        };
        list.into_iter()
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct LdRating {
    #[serde(rename = "ratingValue", default)]
    rating_value: Option<RatingValue>,
    #[serde(rename = "ratingCount", default)]
    rating_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RatingValue {
    Text(String),
    Number(f64),
}

impl RatingValue {
    fn into_string(self) -> String {
        match self {
            RatingValue::Text(s) => s,
            RatingValue::Number(n) => n.to_string(),
        }
    }
}

impl CatalogClient {
    pub(crate) async fn fetch_show(&self, canonical_link: &str) -> Result<ShowRecord, LookupError> {
        let body = self.get_html(canonical_link).await?;
        parse_show_page(&body, canonical_link)
    }
}

/// Decode the embedded ld+json block of a detail page into an unscored record.
pub(crate) fn parse_show_page(body: &str, canonical_link: &str) -> Result<ShowRecord, LookupError> {
    let doc = Html::parse_document(body);
    let raw = doc
        .select(&STRUCTURED_DATA)
        .map(|el| element_text(&el))
        .find(|text| !text.trim().is_empty())
        .ok_or_else(|| {
            LookupError::Parse(format!("no structured data block on {canonical_link}"))
        })?;

    let show: LdShow = serde_json::from_str(raw.trim()).map_err(|e| {
        LookupError::Parse(format!("malformed structured data on {canonical_link}: {e}"))
    })?;

    let genres = show.genre.map(GenreField::into_list).unwrap_or_default();
    if genres.is_empty() {
        return Err(LookupError::Parse(format!(
            "structured data on {canonical_link} has no genre"
        )));
    }

    let (average_rating, rating_count) = show
        .aggregate_rating
        .map(|r| {
            (
                r.rating_value.map(RatingValue::into_string).unwrap_or_default(),
                r.rating_count.unwrap_or_default(),
            )
        })
        .unwrap_or_default();

    Ok(ShowRecord {
        title: unescape_html(&show.name),
        canonical_link: canonical_link.to_string(),
        image: show.image.unwrap_or_default(),
        genres,
        average_rating,
        rating_count,
        description: show
            .description
            .as_deref()
            .map(unescape_html)
            .unwrap_or_default(),
        score: 0,
        is_new_season: false,
        streaming_service: StreamingService::None,
    })
}
