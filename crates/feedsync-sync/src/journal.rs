//! Daily change journal.
//!
//! Each applied field batch is appended to `<dir>/<dd-mm-yyyy>.log`:
//!
//! ```text
//! Summary [14:05] sync:inventory:
//! 1235.11 -> 99
//! ```
//!
//! Description lines are shortened to their first 40 characters.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, NaiveDateTime};
use feedsync_diff::{CellWrite, WriteBatch};
use feedsync_types::Field;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::SyncResult;

/// Date format of journal file names.
pub const JOURNAL_DATE_FORMAT: &str = "%d-%m-%Y";

const JOURNAL_EXTENSION: &str = ".log";

/// Description values are cut to this many characters.
const DESCRIPTION_EXCERPT: usize = 40;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeJournal {
    dir: PathBuf,
}

impl ChangeJournal {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Journal file for `date`.
    pub fn file_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}{JOURNAL_EXTENSION}", date.format(JOURNAL_DATE_FORMAT)))
    }

    /// Remove journal files of days before `today`.
    ///
    /// Files whose names are not journal dates are left alone. A missing
    /// directory counts as clean. Returns the number of removed files.
    pub fn clean(&self, today: NaiveDate) -> SyncResult<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(date) = entry.file_name().to_str().and_then(journal_date) else {
                continue;
            };
            if date < today {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }

        if removed > 0 {
            info!(dir = %self.dir.display(), removed, "removed old journal files");
        }
        Ok(removed)
    }

    /// [`ChangeJournal::clean`] relative to the local date.
    pub fn clean_stale(&self) -> SyncResult<usize> {
        self.clean(Local::now().date_naive())
    }

    /// Append the summary of `batch` as of `now`.
    pub fn record_at(&self, batch: &WriteBatch, now: NaiveDateTime) -> SyncResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.file_for(now.date());

        let mut entry = format!("Summary [{}] sync:{}:\n", now.format("%H:%M"), batch.field);
        for write in &batch.writes {
            entry.push_str(&journal_line(write));
            entry.push('\n');
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(entry.as_bytes())?;
        debug!(
            path = %path.display(),
            field = %batch.field,
            lines = batch.writes.len(),
            "journaled batch"
        );
        Ok(path)
    }

    /// Append the summary of `batch` at the local time.
    pub fn record(&self, batch: &WriteBatch) -> SyncResult<PathBuf> {
        self.record_at(batch, Local::now().naive_local())
    }
}

fn journal_date(name: &str) -> Option<NaiveDate> {
    let stem = name.strip_suffix(JOURNAL_EXTENSION)?;
    NaiveDate::parse_from_str(stem, JOURNAL_DATE_FORMAT).ok()
}

fn excerpt(value: &str) -> String {
    value.chars().take(DESCRIPTION_EXCERPT).collect()
}

fn journal_line(write: &CellWrite) -> String {
    match write.field {
        Field::Description => format!(
            "{}. {}... -> {}...",
            write.sku,
            excerpt(&write.previous),
            excerpt(&write.value)
        ),
        _ => format!("{}.{} -> {}", write.sku, write.previous, write.value),
    }
}
