//! External process operations.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use super::RealRuntime;

/// How a spawned command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl CommandStatus {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for CommandStatus {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl std::fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit status {}", code),
            None => write!(f, "terminated by signal"),
        }
    }
}

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn probe_command_impl(&self, program: &str, args: &[String]) -> Result<CommandStatus> {
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .with_context(|| format!("Failed to run {}", program))?;
        Ok(status.into())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn run_command_impl(&self, program: &Path, args: &[String]) -> Result<CommandStatus> {
        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("Failed to run {}", program.display()))?;
        Ok(status.into())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn which_impl(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::CommandStatus;
    use crate::runtime::{RealRuntime, Runtime};

    #[test]
    fn test_command_status_success() {
        assert!(CommandStatus::from_code(0).success());
        assert!(!CommandStatus::from_code(1).success());
        assert!(!CommandStatus { code: None }.success());
    }

    #[test]
    fn test_command_status_display() {
        assert_eq!(CommandStatus::from_code(2).to_string(), "exit status 2");
        assert_eq!(
            CommandStatus { code: None }.to_string(),
            "terminated by signal"
        );
    }

    #[test]
    fn test_probe_missing_command_is_error() {
        let runtime = RealRuntime;
        let result = runtime.probe_command("appdeps-no-such-command-xyz", &["--version".into()]);
        assert!(result.is_err());
    }

    #[test]
    fn test_which_missing_command() {
        let runtime = RealRuntime;
        assert!(runtime.which("appdeps-no-such-command-xyz").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_reports_exit_codes() {
        let runtime = RealRuntime;

        let ok = runtime.probe_command("sh", &["-c".into(), "exit 0".into()]).unwrap();
        assert!(ok.success());

        let failed = runtime.probe_command("sh", &["-c".into(), "exit 3".into()]).unwrap();
        assert_eq!(failed.code, Some(3));
    }
}
