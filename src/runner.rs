//! Subprocess execution with captured output.
//!
//! [`CommandRunner`] is the seam between the runtime wrappers and the operating system:
//! [`SystemRunner`] spawns real processes, tests substitute scripted runners.
//! Exit status is reported separately from the captured text so callers decide
//! what a failure means for their command.

use anyhow::{anyhow, Context, Result};
use log::trace;
use std::process::Command;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Converts a non-zero exit into an error carrying the command's stderr.
    pub fn into_success(self, what: &str) -> Result<Self> {
        if self.success() {
            return Ok(self);
        }

        let status = match self.code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        };
        Err(anyhow!(
            "{} failed ({}): {}",
            what,
            status,
            self.stderr.trim()
        ))
    }
}

pub trait CommandRunner {
    /// Runs `program` with `args` to completion and captures its output.
    ///
    /// Errors only when the process could not be spawned; a non-zero exit is
    /// reported through [`CommandOutput::code`].
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

/// Runs commands with [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        trace!("Running {} {:?}", program, args);

        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| {
                format!(
                    "Failed to execute {} command: {:?}. Is {} installed?",
                    program, args, program
                )
            })?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            code: output.status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_success_passes_through() {
        let output = CommandOutput {
            stdout: "abc\n".to_string(),
            stderr: String::new(),
            code: Some(0),
        };
        assert_eq!(output.clone().into_success("docker create").unwrap(), output);
    }

    #[test]
    fn test_into_success_reports_stderr() {
        let output = CommandOutput {
            stdout: String::new(),
            stderr: "Error: No such image: deadbeef\n".to_string(),
            code: Some(1),
        };
        let error = output.into_success("docker create").unwrap_err().to_string();
        assert!(error.contains("docker create failed"));
        assert!(error.contains("exit status 1"));
        assert!(error.contains("No such image"));
    }

    #[test]
    fn test_signal_is_not_success() {
        let output = CommandOutput {
            code: None,
            ..Default::default()
        };
        assert!(!output.success());
        let error = output.into_success("docker export").unwrap_err().to_string();
        assert!(error.contains("terminated by signal"));
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let result = SystemRunner.run("this-program-definitely-does-not-exist", &["--version"]);
        assert!(result.is_err());
    }
}
