use anyhow::{Context, Result};
use reqwest::header::ACCEPT_LANGUAGE;
use reqwest::Client;
use scraper::{ElementRef, Selector};
use std::time::Duration;

use crate::error::LookupError;

/// Compile a selector known at compile time.
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static CSS selector must be valid")
}

/// Concatenated text of an element and its descendants.
pub(crate) fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>()
}

/// Direct element children, skipping text and comment nodes.
pub(crate) fn child_elements<'a>(el: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    el.children().filter_map(ElementRef::wrap).collect()
}

/// Shared HTTP client settings for every scraped source.
pub(crate) fn http_client() -> Result<Client> {
    let user_agent = format!("showscout/{}", env!("CARGO_PKG_VERSION"));
    Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(30))
        .user_agent(user_agent)
        .build()
        .context("Failed to build HTTP client")
}

/// GET a page and return its body, mapping network failures and non-success
/// statuses to `LookupError::Transport`.
pub(crate) async fn get_html(client: &Client, url: &str) -> Result<String, LookupError> {
    let res = client
        .get(url)
        .header(ACCEPT_LANGUAGE, "en-US")
        .send()
        .await
        .map_err(|e| LookupError::transport(url, e))?;
    let status = res.status();
    if !status.is_success() {
        return Err(LookupError::transport(url, format!("status {status}")));
    }
    res.text()
        .await
        .map_err(|e| LookupError::transport(url, format!("reading body failed: {e}")))
}
