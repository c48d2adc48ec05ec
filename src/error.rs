//! Failure categories of an install step.

use std::path::PathBuf;

/// Why a step of an install pipeline failed.
///
/// None of these stop the run: each one is printed where it happens and
/// recorded in the pipeline report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallError {
    /// The system identification string matched no known platform
    UnsupportedOs(String),
    /// A version query on the command did not exit successfully
    CommandAbsent { command: String, reason: String },
    /// The artifact could not be downloaded
    Network { url: String, message: String },
    /// The artifact could not be unpacked
    Extraction { path: PathBuf, message: String },
    /// An external tool needed for extraction is not on PATH
    ToolMissing(String),
    /// The native platform installer failed
    Installer { path: PathBuf, message: String },
    /// Any other file system failure
    Io { path: PathBuf, message: String },
}

impl std::fmt::Display for InstallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallError::UnsupportedOs(name) => write!(f, "Unsupported OS: {}", name),
            InstallError::CommandAbsent { command, reason } => {
                write!(f, "{} is not available: {}", command, reason)
            }
            InstallError::Network { url, message } => {
                write!(f, "Error downloading {}: {}", url, message)
            }
            InstallError::Extraction { path, message } => {
                write!(f, "Error unpacking {}: {}", path.display(), message)
            }
            InstallError::ToolMissing(tool) => {
                write!(f, "{} not found on PATH; please install it", tool)
            }
            InstallError::Installer { path, message } => {
                write!(f, "Installer failed for {}: {}", path.display(), message)
            }
            InstallError::Io { path, message } => {
                write!(f, "I/O error on {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for InstallError {}

/// Render an error chain on one line, outermost context first.
pub(crate) fn chain_message(error: &anyhow::Error) -> String {
    format!("{:#}", error)
}
