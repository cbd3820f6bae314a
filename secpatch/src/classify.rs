use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::expiry::ExpiryEvaluator;
use crate::runner::RunError;
use crate::severity::{self, Severity};

/// Aggregated outcome of one classification run: matched advisory text per
/// tier, the soonest upcoming remediation deadline, and whether any patch's
/// window has already lapsed.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub critical: Vec<String>,
    pub important: Vec<String>,
    pub moderate: Vec<String>,
    pub low: Vec<String>,
    pub next_patch_date: Option<NaiveDate>,
    pub expired: bool,
}

impl RunSummary {
    pub fn bucket(&self, severity: Severity) -> &[String] {
        match severity {
            Severity::Critical => &self.critical,
            Severity::Important => &self.important,
            Severity::Moderate => &self.moderate,
            Severity::Low => &self.low,
        }
    }

    fn bucket_mut(&mut self, severity: Severity) -> &mut Vec<String> {
        match severity {
            Severity::Critical => &mut self.critical,
            Severity::Important => &mut self.important,
            Severity::Moderate => &mut self.moderate,
            Severity::Low => &mut self.low,
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.bucket(severity).len()
    }

    /// First deadline seen is adopted; afterwards only a strictly earlier
    /// one replaces it.
    fn track_deadline(&mut self, date: NaiveDate) {
        match self.next_patch_date {
            Some(current) if current <= date => {}
            _ => self.next_patch_date = Some(date),
        }
    }
}

/// Buckets advisory listing lines by severity and drives per-patch deadline
/// evaluation.
pub struct Classifier<'a> {
    evaluator: ExpiryEvaluator<'a>,
    exclude_kernel: bool,
    verbose: bool,
}

impl<'a> Classifier<'a> {
    pub fn new(evaluator: ExpiryEvaluator<'a>, exclude_kernel: bool, verbose: bool) -> Self {
        Self {
            evaluator,
            exclude_kernel,
            verbose,
        }
    }

    pub fn classify(&self, lines: &[String]) -> Result<RunSummary, RunError> {
        let mut summary = RunSummary::default();
        for line in lines {
            self.classify_line(line, &mut summary)?;
        }
        if self.verbose {
            info!(next_patch_date = ?summary.next_patch_date, "next patch deadline");
        }
        Ok(summary)
    }

    fn classify_line(&self, line: &str, summary: &mut RunSummary) -> Result<(), RunError> {
        if self.exclude_kernel {
            if let Some(caps) = severity::KERNEL_PATCH.captures(line) {
                if self.verbose {
                    let patch = &caps[1];
                    info!(patch = %patch, "skipping kernel advisory");
                }
                return Ok(());
            }
        }

        // Browser packages are critical regardless of their advisory tier,
        // and bypass the deadline lookup.
        if let Some(caps) = severity::ALWAYS_CRITICAL.captures(line) {
            debug!(line = %line, "always-critical package");
            summary.critical.push(caps[0].trim().to_string());
            if self.verbose {
                let package = &caps[1];
                info!(severity = %Severity::Critical, package = %package, "pending security update");
            }
            return Ok(());
        }

        // Every tier is tested; a line matching several marker patterns is
        // counted in each matching bucket.
        for tier in Severity::ALL {
            let Some(caps) = tier.marker().captures(line) else {
                continue;
            };
            let Some(patch) = severity::leading_token(line) else {
                warn!(line = %line, "advisory line has no leading identifier, skipping");
                return Ok(());
            };

            let expiry = self.evaluator.evaluate(patch, tier.window_days())?;
            summary.bucket_mut(tier).push(caps[0].to_string());
            if expiry.expired {
                summary.expired = true;
            }
            if let Some(deadline) = expiry.expires_on {
                summary.track_deadline(deadline);
            }
            if self.verbose {
                info!(
                    severity = %tier,
                    patch = %patch,
                    expires_on = ?expiry.expires_on,
                    "pending security update"
                );
            }
        }
        Ok(())
    }
}
