use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Severity tiers used by `updateinfo list` output, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Critical,
    Important,
    Moderate,
    Low,
}

static RE_CRITICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Critical/Sec\.\s*(.*)$").unwrap());
static RE_IMPORTANT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Important/Sec\.\s*(.*)$").unwrap());
static RE_MODERATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Moderate/Sec\.\s*(.*)$").unwrap());
static RE_LOW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Low/Sec\.\s*(.*)$").unwrap());

/// Kernel advisories, skippable when kernel live patching is in use.
pub static KERNEL_PATCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/Sec\.\s*(kernel.*)").unwrap());

/// Packages escalated to critical no matter which tier the advisory carries.
pub static ALWAYS_CRITICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(firefox.*|chrom.*)").unwrap());

static RE_LEADING_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\S+)\s").unwrap());

impl Severity {
    /// Tier scan order applied by the classifier. A line is tested against
    /// every tier; matching is deliberately non-exclusive.
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::Important,
        Severity::Moderate,
        Severity::Low,
    ];

    /// Pattern marking a listing line as belonging to this tier.
    pub fn marker(self) -> &'static Regex {
        match self {
            Severity::Critical => &RE_CRITICAL,
            Severity::Important => &RE_IMPORTANT,
            Severity::Moderate => &RE_MODERATE,
            Severity::Low => &RE_LOW,
        }
    }

    /// Days between a patch's release and its remediation deadline.
    pub fn window_days(self) -> i64 {
        match self {
            Severity::Critical => 30,
            Severity::Important | Severity::Moderate | Severity::Low => 90,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Critical => "Critical",
            Severity::Important => "Important",
            Severity::Moderate => "Moderate",
            Severity::Low => "Low",
        };
        f.write_str(label)
    }
}

/// First whitespace-delimited token of an advisory line, used as the patch
/// identifier. `None` when the line fails the token-then-whitespace shape.
pub fn leading_token(line: &str) -> Option<&str> {
    RE_LEADING_TOKEN
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}
