use crate::error::{InstallError, chain_message};
use crate::runtime::Runtime;
use anyhow::{Context, Result};
use log::{debug, warn};
use std::io::BufReader;
use std::path::Path;
use tar::Archive;
use xz2::read::XzDecoder;

use super::ArchiveExtractor;

/// Streaming extractor for `.tar.xz` archives
pub struct TarXzExtractor;

impl ArchiveExtractor for TarXzExtractor {
    fn can_handle<R: Runtime>(&self, _runtime: &R, archive_path: &Path) -> bool {
        let name = archive_path.to_string_lossy().to_lowercase();
        name.ends_with(".tar.xz") || name.ends_with(".txz")
    }

    #[tracing::instrument(skip(self, runtime))]
    fn extract<R: Runtime>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<(), InstallError> {
        if !runtime.exists(archive_path) {
            return Err(InstallError::Extraction {
                path: archive_path.to_path_buf(),
                message: "artifact not found".to_string(),
            });
        }
        self.extract_impl(runtime, archive_path, extract_to)
            .map_err(|e| InstallError::Extraction {
                path: archive_path.to_path_buf(),
                message: chain_message(&e),
            })
    }
}

impl TarXzExtractor {
    fn extract_impl<R: Runtime>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()> {
        debug!("Extracting tar.xz archive to {:?}...", extract_to);
        let file = runtime
            .open(archive_path)
            .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;
        runtime.create_dir_all(extract_to)?;

        let decoder = XzDecoder::new(BufReader::new(file));
        let mut archive = Archive::new(decoder);

        let mut count = 0usize;
        for entry in archive
            .entries()
            .context("Failed to read tar.xz archive")?
        {
            let mut entry = entry.context("Failed to read tar entry")?;
            let path = entry.path()?.into_owned();
            // unpack_in refuses entries that would land outside extract_to
            let unpacked = entry
                .unpack_in(extract_to)
                .with_context(|| format!("Failed to extract {:?}", path))?;
            if unpacked {
                count += 1;
            } else {
                warn!("Skipping unsafe path in tar: {:?}", path);
            }
        }

        debug!("Extracted {} entries", count);
        Ok(())
    }
}
