use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamingService {
    Netflix,
    AmazonPrime,
    DisneyPlus,
    #[default]
    None,
}

impl StreamingService {
    pub fn display_name(&self) -> Option<&'static str> {
        match self {
            StreamingService::Netflix => Some("Netflix"),
            StreamingService::AmazonPrime => Some("Amazon Prime"),
            StreamingService::DisneyPlus => Some("Disney+"),
            StreamingService::None => None,
        }
    }
}

impl fmt::Display for StreamingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name().unwrap_or("none"))
    }
}

/// A listing row that survived scraping filters and awaits enrichment.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Candidate {
    pub title: String,
    pub is_new_season: bool,
    pub genres: Vec<String>,
    pub streaming_service: StreamingService,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PremiereWindow {
    /// Checkpoint supplied by the caller; exclusive.
    pub start_marker: String,
    /// Newest date header seen on the page; becomes the next checkpoint.
    pub end_marker: String,
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ShowRecord {
    pub title: String,
    pub canonical_link: String,
    pub image: String,
    pub genres: Vec<String>,
    pub average_rating: String,
    pub rating_count: u64,
    pub description: String,
    pub score: u32,
    pub is_new_season: bool,
    pub streaming_service: StreamingService,
}
