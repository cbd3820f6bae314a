use std::path::PathBuf;

use clap::Parser;

/// Monitoring check for pending security updates
#[derive(Parser)]
#[command(name = "secpatch", version)]
pub struct Cli {
    /// Log each pending patch with its remediation deadline
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,

    /// Omit kernel patches (if kernel live patches are enabled)
    #[arg(short, long)]
    pub kernel: bool,

    /// Local cache file for patch release dates
    #[arg(short, long, default_value = "/tmp/check-security-updates.cache")]
    pub cache: PathBuf,
}
