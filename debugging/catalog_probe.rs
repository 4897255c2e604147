//! Resolve a title against the catalog, fetch its record and print it with its score.
//! Usage:
//!   cargo run --bin catalog_probe -- "<series title>" [new]
//! Pass `new` to apply the new-series score floor instead of the returning one.

use anyhow::{Context, Result};
use dotenvy::dotenv;
use showscout::catalog::{fuzzify, CatalogApi, CatalogClient, CATALOG_BASE};
use showscout::enrich::score_floor;
use showscout::score::score;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    let mut args = env::args().skip(1);
    let title = args
        .next()
        .context("usage: catalog_probe \"<series title>\" [new]")?;
    let is_new = args.next().is_some_and(|a| a.eq_ignore_ascii_case("new"));
    let base = env::var("SHOWSCOUT_CATALOG_BASE").unwrap_or_else(|_| CATALOG_BASE.to_string());

    let client = CatalogClient::with_base_url(&base)?;
    println!("query key: {:?}", fuzzify(&title));

    let link = client.resolve(&title).await?;
    println!("resolved:  {link}");

    let show = client.fetch(&link).await?;
    let value = score(&show.average_rating, show.rating_count);
    let floor = score_floor(is_new);
    println!("title:     {}", show.title);
    println!("genres:    {}", show.genres.join(", "));
    println!(
        "rating:    {} ({} votes)",
        show.average_rating, show.rating_count
    );
    println!(
        "score:     {value}/100 (floor {floor}: {})",
        if value >= floor { "kept" } else { "filtered" }
    );
    println!("image:     {}", show.image);
    println!("\n{}", show.description);
    Ok(())
}
