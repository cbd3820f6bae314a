use std::cell::RefCell;

use crate::runner::{CommandRunner, RunError};

/// Scripted stand-in for the package manager: replies to `updateinfo list`
/// and `updateinfo info` with canned lines and records every invocation.
#[derive(Debug, Default)]
pub(crate) struct ScriptedRunner {
    list_lines: Vec<String>,
    info_lines: Vec<String>,
    fail: bool,
    calls: RefCell<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn with_list_lines(mut self, lines: Vec<String>) -> Self {
        self.list_lines = lines;
        self
    }

    pub fn with_info_lines(mut self, lines: Vec<String>) -> Self {
        self.info_lines = lines;
        self
    }

    /// Runner whose every call fails fatally.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, argv: &[&str]) -> Result<Vec<String>, RunError> {
        self.calls
            .borrow_mut()
            .push(argv.iter().map(|s| s.to_string()).collect());
        if self.fail {
            return Err(RunError::Failed(
                argv.first().unwrap_or(&"").to_string(),
                "exit status 1".to_string(),
            ));
        }
        match argv.get(2).copied() {
            Some("list") => Ok(self.list_lines.clone()),
            Some("info") => Ok(self.info_lines.clone()),
            _ => Ok(Vec::new()),
        }
    }
}
