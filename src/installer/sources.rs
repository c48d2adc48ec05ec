use log::debug;

use super::Dependency;
use crate::platform::Os;
use crate::runtime::Runtime;

pub const MAC_PYTHON_URL: &str =
    "https://www.python.org/ftp/python/3.13.0/python-3.13.0-macos11.pkg";
pub const WIN_PYTHON_URL: &str =
    "https://www.python.org/ftp/python/3.13.0/python-3.13.0-embed-amd64.zip";
pub const WIN_FFMPEG_URL: &str = "https://www.gyan.dev/ffmpeg/builds/ffmpeg-release-essentials.7z";
pub const MAC_FFMPEG_URL: &str = "https://evermeet.cx/ffmpeg/ffmpeg-117464-g1eb026dd8b.7z";
pub const LINUX_FFMPEG_URL: &str = "https://github.com/BtbN/FFmpeg-Builds/releases/download/latest/ffmpeg-master-latest-linux64-gpl-shared.tar.xz";

/// Environment variable replacing the Python download URL.
pub const PYTHON_URL_ENV: &str = "APPDEPS_PYTHON_URL";
/// Environment variable replacing the FFmpeg download URL.
pub const FFMPEG_URL_ENV: &str = "APPDEPS_FFMPEG_URL";

/// Built-in download URL for a dependency on a platform.
pub fn default_url(dependency: Dependency, os: Os) -> Option<&'static str> {
    match (dependency, os) {
        (Dependency::Python, Os::MacOs) => Some(MAC_PYTHON_URL),
        (Dependency::Python, Os::Windows) => Some(WIN_PYTHON_URL),
        (Dependency::Python, Os::Linux) => None,
        (Dependency::Ffmpeg, Os::MacOs) => Some(MAC_FFMPEG_URL),
        (Dependency::Ffmpeg, Os::Windows) => Some(WIN_FFMPEG_URL),
        (Dependency::Ffmpeg, Os::Linux) => Some(LINUX_FFMPEG_URL),
    }
}

/// Download URLs, with optional per-dependency overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sources {
    python: Option<String>,
    ffmpeg: Option<String>,
}

impl Sources {
    pub fn new(python: Option<String>, ffmpeg: Option<String>) -> Self {
        Self { python, ffmpeg }
    }

    /// Read overrides from `APPDEPS_PYTHON_URL` and `APPDEPS_FFMPEG_URL`.
    pub fn from_env<R: Runtime>(runtime: &R) -> Self {
        let read = |key: &str| {
            let value = runtime.env_var(key).ok().filter(|v| !v.trim().is_empty());
            if let Some(url) = &value {
                debug!("Using {} from {}", url, key);
            }
            value
        };
        Self::new(read(PYTHON_URL_ENV), read(FFMPEG_URL_ENV))
    }

    /// URL to download for `dependency` on `os`.
    ///
    /// Overrides apply to whichever platform is detected, except where the
    /// dependency is never downloaded (Python on Linux).
    pub fn url(&self, dependency: Dependency, os: Os) -> Option<String> {
        let default = default_url(dependency, os)?;
        let overridden = match dependency {
            Dependency::Python => self.python.as_deref(),
            Dependency::Ffmpeg => self.ffmpeg.as_deref(),
        };
        Some(overridden.unwrap_or(default).to_string())
    }
}
