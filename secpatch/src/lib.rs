pub mod cache;
pub mod classify;
pub mod expiry;
pub mod report;
pub mod runner;
pub mod severity;

#[cfg(test)]
pub(crate) mod testutil;

use chrono::NaiveDate;

use cache::PatchDateCache;
use classify::{Classifier, RunSummary};
use expiry::ExpiryEvaluator;
use runner::{CommandRunner, RunError};

/// Listing command queried once per invocation.
pub const LIST_COMMAND: &[&str] = &["yum", "updateinfo", "list"];

#[derive(Debug, Clone, Copy, Default)]
pub struct CheckOptions {
    /// Skip kernel advisories (kernel live patching in use).
    pub exclude_kernel: bool,
    /// Log one info event per counted patch.
    pub verbose: bool,
}

/// One full check: list pending security advisories, classify them, and
/// evaluate remediation deadlines. Fatal external-command failures are the
/// only error; everything else degrades to "no data" with a log event.
pub fn check(
    runner: &dyn CommandRunner,
    cache: &dyn PatchDateCache,
    today: NaiveDate,
    options: CheckOptions,
) -> Result<RunSummary, RunError> {
    let lines = runner.run(LIST_COMMAND)?;
    let evaluator = ExpiryEvaluator::new(cache, runner, today);
    Classifier::new(evaluator, options.exclude_kernel, options.verbose).classify(&lines)
}
