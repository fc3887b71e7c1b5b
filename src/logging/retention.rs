//! Log file retention management
//!
//! Handles cleanup of old log files based on age.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, TimeZone};

/// Default retention period in days
pub const DEFAULT_RETENTION_DAYS: u64 = 7;

/// Outcome of one cleanup pass
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Files that were deleted
    pub removed: Vec<PathBuf>,
    /// Files that were old enough but could not be deleted
    pub failed: Vec<(PathBuf, io::Error)>,
}

impl CleanupReport {
    /// Check if the pass touched nothing
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.failed.is_empty()
    }
}

/// Clean up log files older than the default retention period
pub fn cleanup_old_logs(logs_dir: &Path) -> Result<CleanupReport> {
    cleanup_old_logs_with_retention(logs_dir, DEFAULT_RETENTION_DAYS, Local::now())
}

/// Clean up `.log` files in `logs_dir` that are at least `retention_days` old
/// as of `now`
///
/// A file's age comes from its `YYYY-MM-DD.log` name, or from its modification
/// time when the name is not a date.
pub fn cleanup_old_logs_with_retention(
    logs_dir: &Path,
    retention_days: u64,
    now: DateTime<Local>,
) -> Result<CleanupReport> {
    let mut report = CleanupReport::default();

    if !logs_dir.exists() {
        return Ok(report);
    }

    let entries = fs::read_dir(logs_dir)
        .with_context(|| format!("Failed to read log directory {}", logs_dir.display()))?;

    for entry in entries {
        let Ok(entry) = entry else {
            continue;
        };
        let path = entry.path();

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(".log") {
            continue;
        }

        let Some(born) = file_date(name).or_else(|| modified_at(&entry)) else {
            continue;
        };

        if age_in_days(born, now) >= retention_days as i64 {
            match fs::remove_file(&path) {
                Ok(()) => report.removed.push(path),
                Err(e) => report.failed.push((path, e)),
            }
        }
    }

    Ok(report)
}

/// Local midnight of the date in a `YYYY-MM-DD.log` file name
pub fn file_date(name: &str) -> Option<DateTime<Local>> {
    let stem = name.strip_suffix(".log")?;
    let date = NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()?;
    Local
        .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
        .earliest()
}

fn modified_at(entry: &fs::DirEntry) -> Option<DateTime<Local>> {
    let modified = entry.metadata().ok()?.modified().ok()?;
    Some(DateTime::<Local>::from(modified))
}

/// Whole days elapsed from `born` to `now`, negative for future dates
fn age_in_days(born: DateTime<Local>, now: DateTime<Local>) -> i64 {
    (now - born).num_days()
}
