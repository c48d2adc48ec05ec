//! Operating system detection.
//!
//! The bootstrapper only knows three platforms. Detection works on the
//! system identification string (`uname` sysname on Unix), so anything that
//! is not macOS, Windows or Linux is reported as unsupported.

use serde::Serialize;
use std::fmt;

/// Operating systems with an install pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Os {
    MacOs,
    Windows,
    Linux,
}

impl Os {
    /// Map an identification string to a platform.
    ///
    /// Matching is a case-insensitive substring search for `darwin`,
    /// `windows` and `linux`, in that order. Returns `None` for anything else.
    pub fn detect(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        if name.contains("darwin") {
            Some(Os::MacOs)
        } else if name.contains("windows") {
            Some(Os::Windows)
        } else if name.contains("linux") {
            Some(Os::Linux)
        } else {
            None
        }
    }

    /// Directory segment used for this platform under each dependency.
    pub const fn dir_name(&self) -> &'static str {
        match self {
            Os::MacOs => "MacOs",
            Os::Windows => "Windows",
            Os::Linux => "Linux",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Os::MacOs => "macOS",
            Os::Windows => "Windows",
            Os::Linux => "Linux",
        };
        write!(f, "{}", name)
    }
}
