use std::fmt;

use crate::classify::RunSummary;
use crate::severity::Severity;

/// Monitoring status, per the monitoring-plugins exit-code convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    pub fn exit_code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

/// Renders the status line consumed by the monitoring system. `None` means
/// no listing command ever completed, which is UNKNOWN with a bare label.
///
/// Escalation: expired patches in the non-critical tiers raise WARNING; any
/// critical patch raises CRITICAL regardless of expiry.
pub fn render(summary: Option<&RunSummary>) -> (Status, String) {
    let Some(summary) = summary else {
        return (Status::Unknown, Status::Unknown.to_string());
    };

    let mut status = Status::Ok;
    if summary.expired
        && (summary.count(Severity::Important) > 0
            || summary.count(Severity::Moderate) > 0
            || summary.count(Severity::Low) > 0)
    {
        status = Status::Warning;
    }
    if summary.count(Severity::Critical) > 0 {
        status = Status::Critical;
    }

    let next = summary
        .next_patch_date
        .map(|d| d.to_string())
        .unwrap_or_default();
    let critical = summary.count(Severity::Critical);
    let important = summary.count(Severity::Important);
    let moderate = summary.count(Severity::Moderate);
    let low = summary.count(Severity::Low);

    let message = format!(
        "{status}: Critical={critical} Important={important} Moderate={moderate} Low={low} \
         next_patch_date={next}\
         |Critical={critical};Important={important};Moderate={moderate};Low={low};"
    );
    (status, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn summary_with(
        critical: usize,
        important: usize,
        moderate: usize,
        low: usize,
        expired: bool,
    ) -> RunSummary {
        RunSummary {
            critical: vec!["c".to_string(); critical],
            important: vec!["i".to_string(); important],
            moderate: vec!["m".to_string(); moderate],
            low: vec!["l".to_string(); low],
            expired,
            ..RunSummary::default()
        }
    }

    #[test]
    fn no_completed_run_is_a_bare_unknown() {
        let (status, message) = render(None);
        assert_eq!(status, Status::Unknown);
        assert_eq!(message, "UNKNOWN");
    }

    #[test]
    fn empty_summary_is_ok() {
        let (status, message) = render(Some(&RunSummary::default()));
        assert_eq!(status, Status::Ok);
        assert_eq!(
            message,
            "OK: Critical=0 Important=0 Moderate=0 Low=0 next_patch_date=\
             |Critical=0;Important=0;Moderate=0;Low=0;"
        );
    }

    #[test]
    fn expired_non_critical_patches_escalate_to_warning() {
        let (status, _) = render(Some(&summary_with(0, 1, 0, 2, true)));
        assert_eq!(status, Status::Warning);
    }

    #[test]
    fn non_expired_non_critical_patches_stay_ok() {
        let (status, _) = render(Some(&summary_with(0, 1, 1, 0, false)));
        assert_eq!(status, Status::Ok);
    }

    #[test]
    fn expired_flag_alone_does_not_warn() {
        // Expired can only stem from a counted patch, but the escalation
        // rule still requires a non-critical count.
        let (status, _) = render(Some(&summary_with(0, 0, 0, 0, true)));
        assert_eq!(status, Status::Ok);
    }

    #[test]
    fn critical_overrides_warning() {
        let (status, message) = render(Some(&summary_with(2, 1, 0, 0, true)));
        assert_eq!(status, Status::Critical);
        assert!(message.starts_with("CRITICAL: Critical=2 Important=1 "));
    }

    #[test]
    fn message_includes_deadline_and_perfdata() {
        let mut summary = summary_with(1, 0, 0, 0, false);
        summary.next_patch_date = NaiveDate::from_ymd_opt(2024, 1, 31);
        let (_, message) = render(Some(&summary));
        assert_eq!(
            message,
            "CRITICAL: Critical=1 Important=0 Moderate=0 Low=0 next_patch_date=2024-01-31\
             |Critical=1;Important=0;Moderate=0;Low=0;"
        );
    }

    #[test]
    fn exit_codes_follow_the_plugin_convention() {
        assert_eq!(Status::Ok.exit_code(), 0);
        assert_eq!(Status::Warning.exit_code(), 1);
        assert_eq!(Status::Critical.exit_code(), 2);
        assert_eq!(Status::Unknown.exit_code(), 3);
    }
}
