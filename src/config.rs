use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::CATALOG_BASE;
use crate::enrich::{SubGenreFilter, DEFAULT_CONCURRENCY};
use crate::premieres::PREMIERES_URL;

#[derive(Debug, Clone, Parser)]
#[command(name = "showscout", about = "Weekly report of interesting TV premieres")]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, env = "SHOWSCOUT_CONFIG")]
    pub config: PathBuf,

    /// Directory holding the last processed date marker
    #[arg(long, env = "SHOWSCOUT_LAST_PROCESSED_PATH", default_value = ".")]
    pub last_processed_path: PathBuf,

    /// Directory the HTML report is written to
    #[arg(long, env = "SHOWSCOUT_OUTPUT", default_value = "out")]
    pub output: PathBuf,

    /// Overrides `concurrency` from the config file
    #[arg(long)]
    pub concurrency: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_title")]
    pub title: String,
    pub main_genres: Vec<String>,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default)]
    pub sub_genres: SubGenres,
    #[serde(default)]
    pub sources: Sources,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubGenres {
    #[serde(default)]
    pub fuzzy: Vec<String>,
    #[serde(default)]
    pub exact: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sources {
    #[serde(default = "default_premieres_url")]
    pub premieres_url: String,
    #[serde(default = "default_catalog_base_url")]
    pub catalog_base_url: String,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            premieres_url: default_premieres_url(),
            catalog_base_url: default_catalog_base_url(),
        }
    }
}

fn default_title() -> String {
    "tv-premieres".to_string()
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_premieres_url() -> String {
    PREMIERES_URL.to_string()
}

fn default_catalog_base_url() -> String {
    CATALOG_BASE.to_string()
}

impl Config {
    pub fn parse(data: &str) -> Result<Self> {
        let config: Config = toml::from_str(data).context("Failed to parse config")?;
        if config.main_genres.is_empty() {
            anyhow::bail!("Config must list at least one entry in main_genres");
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&data)
    }

    pub fn sub_genre_filter(&self) -> SubGenreFilter {
        SubGenreFilter::new(self.sub_genres.fuzzy.clone(), self.sub_genres.exact.clone())
    }
}
