//! 7-Zip archives, delegated to an external `7z` binary.

use crate::error::{InstallError, chain_message};
use crate::runtime::Runtime;
use log::debug;
use std::path::{Path, PathBuf};

use super::ArchiveExtractor;

/// Executable names tried in order when looking for 7-Zip.
const SEVENZ_CANDIDATES: [&str; 3] = ["7z", "7za", "7zr"];

/// Extractor for `.7z` files using whatever 7-Zip binary is on PATH
pub struct SevenZipExtractor {
    candidates: Vec<String>,
}

impl Default for SevenZipExtractor {
    fn default() -> Self {
        Self {
            candidates: SEVENZ_CANDIDATES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SevenZipExtractor {
    fn locate<R: Runtime>(&self, runtime: &R) -> Option<PathBuf> {
        self.candidates.iter().find_map(|name| runtime.which(name))
    }
}

impl ArchiveExtractor for SevenZipExtractor {
    fn can_handle<R: Runtime>(&self, _runtime: &R, archive_path: &Path) -> bool {
        archive_path
            .to_string_lossy()
            .to_lowercase()
            .ends_with(".7z")
    }

    #[tracing::instrument(skip(self, runtime))]
    fn extract<R: Runtime>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<(), InstallError> {
        let Some(tool) = self.locate(runtime) else {
            return Err(InstallError::ToolMissing("7z".to_string()));
        };
        debug!("Using 7-Zip at {:?}", tool);

        let args = vec![
            "x".to_string(),
            archive_path.display().to_string(),
            format!("-o{}", extract_to.display()),
            "-y".to_string(),
        ];

        match runtime.run_command(&tool, &args) {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(InstallError::Extraction {
                path: archive_path.to_path_buf(),
                message: format!("{} exited with {}", tool.display(), status),
            }),
            Err(e) => Err(InstallError::Extraction {
                path: archive_path.to_path_buf(),
                message: chain_message(&e),
            }),
        }
    }
}
