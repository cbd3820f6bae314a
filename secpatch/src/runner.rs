use std::io::{self, Read};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use tracing::debug;
use wait_timeout::ChildExt;

use crate::report::Status;

/// Fatal failure of an external command invocation. Any of these terminates
/// the whole check run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("empty command line")]
    InvalidCommand,

    #[error("'{0}' did not finish within {1} seconds")]
    Timeout(String, u64),

    #[error("missing program '{0}': {1}")]
    MissingProgram(String, io::Error),

    #[error("'{0}' failed: {1}")]
    Failed(String, String),
}

impl RunError {
    /// Monitoring status the run terminates with on this failure.
    pub fn status(&self) -> Status {
        match self {
            RunError::InvalidCommand | RunError::Timeout(..) => Status::Unknown,
            RunError::MissingProgram(..) | RunError::Failed(..) => Status::Critical,
        }
    }
}

/// Seam between the classification logic and the package manager. Tests
/// substitute a scripted implementation.
pub trait CommandRunner {
    fn run(&self, argv: &[&str]) -> Result<Vec<String>, RunError>;
}

/// Runs commands as real subprocesses with a hard wall-clock bound.
/// Exactly one process is spawned per call; no retry.
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, argv: &[&str]) -> Result<Vec<String>, RunError> {
        let (program, args) = argv.split_first().ok_or(RunError::InvalidCommand)?;
        debug!(command = ?argv, "running OS command");

        let mut child = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => RunError::MissingProgram((*program).to_string(), e),
                _ => RunError::Failed((*program).to_string(), e.to_string()),
            })?;

        // Drain stdout on a separate thread while waiting, so a child whose
        // output exceeds the pipe buffer is not wedged on write(2) until the
        // timeout fires.
        let reader = child.stdout.take().map(|mut pipe| {
            thread::spawn(move || {
                let mut buf = Vec::new();
                pipe.read_to_end(&mut buf).map(|_| buf)
            })
        });

        let status = match child
            .wait_timeout(self.timeout)
            .map_err(|e| RunError::Failed((*program).to_string(), e.to_string()))?
        {
            Some(status) => status,
            None => {
                // Killing the child closes the pipe, which ends the reader.
                let _ = child.kill();
                let _ = child.wait();
                return Err(RunError::Timeout(
                    (*program).to_string(),
                    self.timeout.as_secs(),
                ));
            }
        };

        let stdout = match reader {
            Some(handle) => handle
                .join()
                .map_err(|_| {
                    RunError::Failed((*program).to_string(), "output reader panicked".to_string())
                })?
                .map_err(|e| RunError::Failed((*program).to_string(), e.to_string()))?,
            None => Vec::new(),
        };

        if !status.success() {
            return Err(RunError::Failed(
                (*program).to_string(),
                format!("exit status {status}"),
            ));
        }

        let stdout = String::from_utf8(stdout)
            .map_err(|e| RunError::Failed((*program).to_string(), e.to_string()))?;
        Ok(stdout.lines().map(str::to_string).collect())
    }
}
