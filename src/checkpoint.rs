use chrono::{DateTime, Duration, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const CHECKPOINT_FILE: &str = "lastprocessed.dat";
const DEFAULT_LOOKBACK_DAYS: i64 = 7;

/// Last processed date header, stored as plain text.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(CHECKPOINT_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored marker, or one week before `now` in listing-header format when the
    /// file is missing or blank.
    pub fn load(&self, now: DateTime<Local>) -> String {
        match fs::read_to_string(&self.path) {
            Ok(raw) if !raw.trim().is_empty() => raw.trim().to_string(),
            _ => default_checkpoint(now),
        }
    }

    pub fn save(&self, marker: &str) -> io::Result<()> {
        fs::write(&self.path, marker)
    }
}

/// `"April 14"` style marker for `now - 7 days`.
pub fn default_checkpoint(now: DateTime<Local>) -> String {
    date_marker(now - Duration::days(DEFAULT_LOOKBACK_DAYS))
}

pub fn date_marker(date: DateTime<Local>) -> String {
    date.format("%B %-d").to_string()
}
