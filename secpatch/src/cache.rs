use std::cell::RefCell;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::error;

/// Timestamp format shared by cache rows and `updateinfo info` output.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Durable mapping from patch identifier to first-observed release date.
/// Backed by a file in production and by memory in tests.
pub trait PatchDateCache {
    /// Release date for `patch`, if one has been recorded.
    fn lookup(&self, patch: &str) -> Option<NaiveDate>;

    /// Record the release date for `patch`. Returns `false` when the entry
    /// could not be written; the failure is logged, never propagated.
    fn store(&self, patch: &str, date: NaiveDate) -> bool;
}

/// Append-only flat file of `identifier,"YYYY-MM-DD HH:MM:SS"` rows, no
/// header. The file is opened fresh per access and never rewritten, so
/// entries survive across invocations and duplicates are possible; lookup
/// takes the first matching row.
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn parse_row(row: &str) -> Option<(&str, NaiveDate)> {
    let (id, raw) = row.split_once(',')?;
    let raw = raw.trim().trim_matches('"');
    let ts = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()?;
    Some((id, ts.date()))
}

impl PatchDateCache for FileCache {
    fn lookup(&self, patch: &str) -> Option<NaiveDate> {
        // A missing or unreadable file is a miss, not an error.
        let file = File::open(&self.path).ok()?;
        for row in BufReader::new(file).lines() {
            let row = row.ok()?;
            match parse_row(&row) {
                Some((id, date)) if id == patch => return Some(date),
                // Malformed rows are skipped.
                _ => {}
            }
        }
        None
    }

    fn store(&self, patch: &str, date: NaiveDate) -> bool {
        let timestamp = date.and_time(NaiveTime::MIN).format(TIMESTAMP_FORMAT);
        let row = format!("{patch},\"{timestamp}\"\n");

        let result = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .and_then(|mut f| f.write_all(row.as_bytes()));
        match result {
            Ok(()) => true,
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to write cache file");
                false
            }
        }
    }
}

/// In-memory cache with the same append-only, first-match semantics as
/// [`FileCache`]. Used for deterministic tests without filesystem I/O.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RefCell<Vec<(String, NaiveDate)>>,
}

impl PatchDateCache for MemoryCache {
    fn lookup(&self, patch: &str) -> Option<NaiveDate> {
        self.entries
            .borrow()
            .iter()
            .find(|(id, _)| id == patch)
            .map(|(_, date)| *date)
    }

    fn store(&self, patch: &str, date: NaiveDate) -> bool {
        self.entries.borrow_mut().push((patch.to_string(), date));
        true
    }
}
