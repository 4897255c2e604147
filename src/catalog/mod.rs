use async_trait::async_trait;

use crate::error::LookupError;
use crate::models::ShowRecord;

mod client;
mod detail;
mod resolve;
mod text;

pub use client::{CatalogClient, CATALOG_BASE};
pub use text::fuzzify;

/// Title resolution and detail lookup against the external series catalog.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Canonical (absolute) link of the most recent series exactly matching `title`.
    async fn resolve(&self, title: &str) -> Result<String, LookupError>;

    /// Structured record behind a canonical link. The returned record is unscored
    /// and carries default season/streaming tags.
    async fn fetch(&self, canonical_link: &str) -> Result<ShowRecord, LookupError>;
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn resolve(&self, title: &str) -> Result<String, LookupError> {
        self.search_series(title).await
    }

    async fn fetch(&self, canonical_link: &str) -> Result<ShowRecord, LookupError> {
        self.fetch_show(canonical_link).await
    }
}
