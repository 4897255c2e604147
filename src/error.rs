use thiserror::Error;

/// Failure of a single outbound lookup (listing page, catalog search, detail page)
/// or of the score gate applied to its result.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LookupError {
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("unexpected page content: {0}")]
    Parse(String),

    #[error("no series match found for '{0}'")]
    NotFound(String),

    #[error("'{0}' has no allow-listed sub-genre")]
    SubGenreMismatch(String),

    #[error("score {score} is below the floor of {floor} for '{title}'")]
    ScoreTooLow {
        title: String,
        score: u32,
        floor: u32,
    },
}

impl LookupError {
    pub(crate) fn transport(url: &str, reason: impl ToString) -> Self {
        LookupError::Transport {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Outcomes that are part of normal operation rather than failures.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            LookupError::NotFound(_)
                | LookupError::ScoreTooLow { .. }
                | LookupError::SubGenreMismatch(_)
        )
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum EnrichError {
    #[error("worker pool needs at least one worker (got {0})")]
    InvalidConcurrency(usize),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to fetch premieres listing: {0}")]
    Listing(#[source] LookupError),

    #[error(transparent)]
    Enrich(#[from] EnrichError),

    #[error("failed to render report: {0}")]
    Render(#[from] std::fmt::Error),

    #[error("no new series between '{start}' and '{end}'")]
    NothingToReport { start: String, end: String },

    #[error("failed to write report to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_expected_outcomes() {
        assert!(LookupError::NotFound("Dark".to_string()).is_expected());
        assert!(LookupError::ScoreTooLow {
            title: "Dark".to_string(),
            score: 10,
            floor: 40
        }
        .is_expected());
        assert!(!LookupError::Parse("no ld+json".to_string()).is_expected());
        assert!(!LookupError::transport("http://x", "status 500").is_expected());
    }
}
