mod cli;

use std::process;
use std::time::Duration;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use secpatch::cache::FileCache;
use secpatch::report;
use secpatch::runner::SystemRunner;
use secpatch::CheckOptions;

use cli::Cli;

const COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

fn main() {
    let args = Cli::parse();

    // All log output goes to stderr; stdout carries only the status line.
    let default_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let runner = SystemRunner::new(COMMAND_TIMEOUT);
    let cache = FileCache::new(&args.cache);
    let today = chrono::Local::now().date_naive();
    let options = CheckOptions {
        exclude_kernel: args.kernel,
        verbose: args.verbose,
    };

    let (status, message) = match secpatch::check(&runner, &cache, today, options) {
        Ok(summary) => report::render(Some(&summary)),
        Err(e) => {
            error!(error = %e, "external command failed");
            (e.status(), e.status().to_string())
        }
    };

    println!("{message}");
    process::exit(status.exit_code());
}
