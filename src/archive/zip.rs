use crate::error::{InstallError, chain_message};
use crate::runtime::Runtime;
use anyhow::{Context, Result};
use log::debug;
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

use super::ArchiveExtractor;

/// Extractor for zip containers, recognised by content rather than name
pub struct ZipExtractor;

impl ArchiveExtractor for ZipExtractor {
    /// A file is a zip container when its central directory parses.
    fn can_handle<R: Runtime>(&self, runtime: &R, archive_path: &Path) -> bool {
        match self.open_archive(runtime, archive_path) {
            Ok(_) => true,
            Err(e) => {
                debug!("Not a zip container {:?}: {:#}", archive_path, e);
                false
            }
        }
    }

    fn extract<R: Runtime>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<(), InstallError> {
        self.extract_impl(runtime, archive_path, extract_to)
            .map_err(|e| InstallError::Extraction {
                path: archive_path.to_path_buf(),
                message: chain_message(&e),
            })
    }
}

impl ZipExtractor {
    fn open_archive<R: Runtime>(
        &self,
        runtime: &R,
        archive_path: &Path,
    ) -> Result<ZipArchive<Cursor<Vec<u8>>>> {
        let mut file = runtime
            .open(archive_path)
            .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;

        // zip crate requires Read + Seek, but Runtime::open returns Box<dyn Read + Send>
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)
            .with_context(|| format!("Failed to read archive {:?}", archive_path))?;

        ZipArchive::new(Cursor::new(buffer)).with_context(|| "Failed to parse ZIP archive")
    }

    fn extract_impl<R: Runtime>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()> {
        debug!("Extracting zip archive to {:?}...", extract_to);
        let mut archive = self.open_archive(runtime, archive_path)?;

        runtime.create_dir_all(extract_to)?;

        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .with_context(|| format!("Failed to read ZIP entry {}", i))?;

            let entry_path = match entry.enclosed_name() {
                Some(path) => path.to_path_buf(),
                None => {
                    debug!("Skipping entry with invalid path");
                    continue;
                }
            };

            let full_path = extract_to.join(&entry_path);

            if entry.is_dir() {
                runtime.create_dir_all(&full_path)?;
            } else {
                if let Some(parent) = full_path.parent() {
                    runtime.create_dir_all(parent)?;
                }
                let mut dest_file = runtime.create_file(&full_path)?;
                std::io::copy(&mut entry, &mut dest_file)
                    .with_context(|| format!("Failed to extract file {:?}", full_path))?;

                #[cfg(unix)]
                if let Some(mode) = entry.unix_mode()
                    && let Err(e) = runtime.set_permissions(&full_path, mode)
                {
                    debug!("Failed to set permissions on {:?}: {}", full_path, e);
                }
            }
        }

        debug!("Extracted {} entries", archive.len());
        Ok(())
    }
}
