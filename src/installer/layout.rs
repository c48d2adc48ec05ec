use std::path::{Path, PathBuf};

use super::Dependency;
use crate::platform::Os;

/// Install root used when none is configured, relative to the working directory.
pub const DEFAULT_ROOT: &str = "App/embedded";

const LINUX_PYTHON_MARKER: &str = "python_installed.log";

/// Where artifacts are downloaded and unpacked.
///
/// Everything lives under `<root>/<dependency>/<os>/`, and archives are
/// extracted into the directory that holds them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn install_dir(&self, dependency: Dependency, os: Os) -> PathBuf {
        self.root.join(dependency.dir_name()).join(os.dir_name())
    }

    /// Download location of the artifact, `None` when nothing is downloaded.
    pub fn artifact(&self, dependency: Dependency, os: Os) -> Option<PathBuf> {
        let file_name = match (dependency, os) {
            (Dependency::Python, Os::MacOs) => "python.pkg",
            (Dependency::Python, Os::Windows) => "python.zip",
            (Dependency::Python, Os::Linux) => return None,
            (Dependency::Ffmpeg, Os::MacOs | Os::Windows) => "ffmpeg.7z",
            (Dependency::Ffmpeg, Os::Linux) => "ffmpeg.tar.xz",
        };
        Some(self.install_dir(dependency, os).join(file_name))
    }

    /// Marker recording that Python was left to the Linux package manager.
    pub fn linux_python_marker(&self) -> PathBuf {
        self.install_dir(Dependency::Python, Os::Linux)
            .join(LINUX_PYTHON_MARKER)
    }
}
