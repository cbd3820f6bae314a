use std::sync::LazyLock;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use regex::Regex;
use tracing::{debug, warn};

use crate::cache::{PatchDateCache, TIMESTAMP_FORMAT};
use crate::runner::{CommandRunner, RunError};

static RE_UPDATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*Updated\s*:\s*(.*)$").unwrap());

/// Outcome of a remediation-window evaluation. `expires_on` is `None` when
/// no release date could be determined for the patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    pub expired: bool,
    pub expires_on: Option<NaiveDate>,
}

/// Resolves a patch's release date (cache first, then a single `updateinfo
/// info` query) and decides whether its remediation window has lapsed.
pub struct ExpiryEvaluator<'a> {
    cache: &'a dyn PatchDateCache,
    runner: &'a dyn CommandRunner,
    today: NaiveDate,
}

impl<'a> ExpiryEvaluator<'a> {
    pub fn new(
        cache: &'a dyn PatchDateCache,
        runner: &'a dyn CommandRunner,
        today: NaiveDate,
    ) -> Self {
        Self {
            cache,
            runner,
            today,
        }
    }

    /// Deadline check for one patch. Missing release dates degrade to
    /// not-expired; only a fatal command failure is an error.
    pub fn evaluate(&self, patch: &str, window_days: i64) -> Result<Expiry, RunError> {
        let release = match self.cache.lookup(patch) {
            Some(date) => {
                debug!(patch = %patch, release = %date, "release date found in local cache");
                Some(date)
            }
            None => self.query_release_date(patch)?,
        };

        let Some(release) = release else {
            warn!(patch = %patch, "no release date available, skipping deadline check");
            return Ok(Expiry {
                expired: false,
                expires_on: None,
            });
        };

        let expires_on = release + Duration::days(window_days);
        // Deadline day itself counts as lapsed.
        let expired = self.today >= expires_on;
        if expired {
            debug!(patch = %patch, expires_on = %expires_on, window_days, "remediation window has lapsed");
        } else {
            debug!(patch = %patch, release = %release, expires_on = %expires_on, "within remediation window");
        }
        Ok(Expiry {
            expired,
            expires_on: Some(expires_on),
        })
    }

    fn query_release_date(&self, patch: &str) -> Result<Option<NaiveDate>, RunError> {
        let lines = self.runner.run(&["yum", "updateinfo", "info", patch])?;

        for line in &lines {
            let Some(caps) = RE_UPDATED.captures(line) else {
                continue;
            };
            let raw = caps[1].trim();
            match NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
                Ok(ts) => {
                    let date = ts.date();
                    if self.cache.store(patch, date) {
                        debug!(patch = %patch, release = %date, "local cache updated");
                    }
                    return Ok(Some(date));
                }
                Err(e) => {
                    warn!(patch = %patch, value = %raw, error = %e, "unparseable release timestamp");
                }
            }
        }
        Ok(None)
    }
}
