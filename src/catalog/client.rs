use anyhow::Result;
use reqwest::Client;

use crate::error::LookupError;
use crate::utils::{get_html, http_client};

pub const CATALOG_BASE: &str = "https://www.imdb.com";
const SEARCH_PATH: &str = "/find";

#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(CATALOG_BASE)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn search_url(&self, title: &str) -> String {
        format!(
            "{}{SEARCH_PATH}?q={}",
            self.base_url,
            urlencoding::encode(title)
        )
    }

    pub(crate) async fn get_html(&self, url: &str) -> Result<String, LookupError> {
        get_html(&self.client, url).await
    }
}
