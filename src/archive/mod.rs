mod sevenz;
mod tar_xz;
mod zip;

use crate::error::InstallError;
use crate::runtime::Runtime;
use log::info;
use std::path::Path;

pub use sevenz::SevenZipExtractor;
pub use tar_xz::TarXzExtractor;
pub use zip::ZipExtractor;

/// Strategy used to unpack an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    SevenZip,
}

/// Trait for format-specific archive extractors
pub trait ArchiveExtractor: Send + Sync {
    /// Check if this extractor can handle the given archive
    fn can_handle<R: Runtime>(&self, runtime: &R, archive_path: &Path) -> bool;

    /// Extract the archive to the specified directory
    fn extract<R: Runtime>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<(), InstallError>;
}

/// Picks the extraction strategy for a downloaded artifact.
///
/// Content is checked before the name: anything whose zip central directory
/// parses is unpacked as zip, otherwise a `.7z` suffix hands the file to the
/// external 7-Zip tool. tar.xz archives have their own [`TarXzExtractor`].
pub struct ArchiveInstaller {
    zip: ZipExtractor,
    sevenz: SevenZipExtractor,
}

impl Default for ArchiveInstaller {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveInstaller {
    pub fn new() -> Self {
        Self {
            zip: ZipExtractor,
            sevenz: SevenZipExtractor::default(),
        }
    }

    /// Select the strategy for `archive_path` without extracting anything.
    pub fn select<R: Runtime>(
        &self,
        runtime: &R,
        archive_path: &Path,
    ) -> Result<ArchiveKind, InstallError> {
        if !runtime.exists(archive_path) {
            return Err(InstallError::Extraction {
                path: archive_path.to_path_buf(),
                message: "artifact not found".to_string(),
            });
        }
        if self.zip.can_handle(runtime, archive_path) {
            return Ok(ArchiveKind::Zip);
        }
        if self.sevenz.can_handle(runtime, archive_path) {
            return Ok(ArchiveKind::SevenZip);
        }
        Err(InstallError::Extraction {
            path: archive_path.to_path_buf(),
            message: "unsupported archive format".to_string(),
        })
    }

    #[tracing::instrument(skip(self, runtime))]
    pub fn install<R: Runtime>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<ArchiveKind, InstallError> {
        let kind = self.select(runtime, archive_path)?;
        println!(
            "Unzipping {} to {}",
            archive_path.display(),
            extract_to.display()
        );
        match kind {
            ArchiveKind::Zip => self.zip.extract(runtime, archive_path, extract_to)?,
            ArchiveKind::SevenZip => self.sevenz.extract(runtime, archive_path, extract_to)?,
        }
        info!("Extracted {} as {:?}", archive_path.display(), kind);
        println!("Unzipped {} successfully.", archive_path.display());
        Ok(kind)
    }
}
