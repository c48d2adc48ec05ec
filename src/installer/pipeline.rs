//! Per-platform install pipelines.

use log::{debug, warn};
use std::path::{Path, PathBuf};

use super::{Bootstrapper, Dependency};
use crate::{
    archive::ArchiveExtractor,
    download::{Downloader, fetch},
    error::{InstallError, chain_message},
    outcome::StepOutcome,
    platform::Os,
    probe::is_installed,
    runtime::Runtime,
};

const LINUX_PYTHON_MARKER_TEXT: &str = "Python installed via package manager.\n";

/// Everything a pipeline needs to download one artifact.
struct Target {
    url: String,
    artifact: PathBuf,
    install_dir: PathBuf,
}

impl<R: Runtime, D: Downloader> Bootstrapper<R, D> {
    pub(crate) async fn install_python(&self, os: Os) -> StepOutcome {
        match os {
            Os::MacOs => self.install_python_macos().await,
            Os::Windows => self.install_python_windows().await,
            Os::Linux => self.record_python_linux(),
        }
    }

    pub(crate) async fn install_ffmpeg(&self, os: Os) -> StepOutcome {
        let dependency = Dependency::Ffmpeg;
        if let Some(skipped) = self.check_presence(dependency, os) {
            return skipped;
        }
        let target = match self.target(dependency, os) {
            Ok(target) => target,
            Err(outcome) => return outcome,
        };

        let download = fetch(&self.runtime, &self.downloader, &target.url, &target.artifact).await;
        let install = if self.tar_xz.can_handle(&self.runtime, &target.artifact) {
            self.extract_tar_xz(&target.artifact, &target.install_dir)
        } else {
            self.extract(&target.artifact, &target.install_dir)
        };
        download.then(install)
    }

    async fn install_python_macos(&self) -> StepOutcome {
        let (dependency, os) = (Dependency::Python, Os::MacOs);
        if let Some(skipped) = self.check_presence(dependency, os) {
            return skipped;
        }
        let target = match self.target(dependency, os) {
            Ok(target) => target,
            Err(outcome) => return outcome,
        };

        let download = fetch(&self.runtime, &self.downloader, &target.url, &target.artifact).await;
        let install = match self.run_pkg_installer(&target.artifact) {
            Ok(()) => {
                println!("Python installed on macOS.");
                StepOutcome::Succeeded
            }
            Err(e) => {
                println!("Python installation failed on macOS. Please install manually.");
                println!("Error: {}", e);
                StepOutcome::Failed(e)
            }
        };
        download.then(install)
    }

    async fn install_python_windows(&self) -> StepOutcome {
        let (dependency, os) = (Dependency::Python, Os::Windows);
        if let Some(skipped) = self.check_presence(dependency, os) {
            return skipped;
        }
        let target = match self.target(dependency, os) {
            Ok(target) => target,
            Err(outcome) => return outcome,
        };

        let download = fetch(&self.runtime, &self.downloader, &target.url, &target.artifact).await;
        let install = self.extract(&target.artifact, &target.install_dir);
        if install == StepOutcome::Succeeded {
            println!("Python installed on Windows.");
        }
        download.then(install)
    }

    /// Python on Linux comes from the distribution; only leave a marker.
    fn record_python_linux(&self) -> StepOutcome {
        println!("Detected Linux. Please use your package manager to install Python.");

        let marker = self.layout.linux_python_marker();
        let written = marker
            .parent()
            .map_or(Ok(()), |dir| self.runtime.create_dir_all(dir))
            .and_then(|()| {
                self.runtime
                    .write(&marker, LINUX_PYTHON_MARKER_TEXT.as_bytes())
            });

        match written {
            Ok(()) => {
                debug!("Wrote {}", marker.display());
                StepOutcome::Skipped("delegated to the system package manager".to_string())
            }
            Err(e) => {
                let error = InstallError::Io {
                    path: marker,
                    message: chain_message(&e),
                };
                println!("{}", error);
                StepOutcome::Failed(error)
            }
        }
    }

    /// `Some(Skipped)` when the tool already answers its version query.
    fn check_presence(&self, dependency: Dependency, os: Os) -> Option<StepOutcome> {
        if self.force {
            debug!("Skipping presence check for {} (forced)", dependency);
            return None;
        }
        let command = dependency.command(os);
        if is_installed(&self.runtime, command, dependency.version_arg()) {
            println!("{} is already installed on {}.", dependency.label(), os);
            return Some(StepOutcome::Skipped(format!("{} already installed", command)));
        }
        None
    }

    fn target(&self, dependency: Dependency, os: Os) -> Result<Target, StepOutcome> {
        let url = self.sources.url(dependency, os);
        let artifact = self.layout.artifact(dependency, os);
        match (url, artifact) {
            (Some(url), Some(artifact)) => Ok(Target {
                url,
                artifact,
                install_dir: self.layout.install_dir(dependency, os),
            }),
            _ => Err(StepOutcome::Skipped(format!(
                "no download for {} on {}",
                dependency, os
            ))),
        }
    }

    fn extract(&self, artifact: &Path, install_dir: &Path) -> StepOutcome {
        match self.archives.install(&self.runtime, artifact, install_dir) {
            Ok(_) => StepOutcome::Succeeded,
            Err(e) => {
                println!("{}", e);
                StepOutcome::Failed(e)
            }
        }
    }

    fn extract_tar_xz(&self, artifact: &Path, install_dir: &Path) -> StepOutcome {
        println!(
            "Extracting {} to {}",
            artifact.display(),
            install_dir.display()
        );
        match self.tar_xz.extract(&self.runtime, artifact, install_dir) {
            Ok(()) => {
                println!("Extracted {} successfully.", artifact.display());
                StepOutcome::Succeeded
            }
            Err(e) => {
                println!("{}", e);
                StepOutcome::Failed(e)
            }
        }
    }

    /// Hand a `.pkg` to the macOS `installer` tool, targeting the boot volume.
    fn run_pkg_installer(&self, pkg: &Path) -> Result<(), InstallError> {
        if !self.runtime.exists(pkg) {
            return Err(InstallError::Installer {
                path: pkg.to_path_buf(),
                message: "installer package not found".to_string(),
            });
        }
        if !self.runtime.is_privileged() {
            warn!("Not running as root, the macOS installer will probably refuse to run");
            println!("The macOS installer needs administrator rights; re-run with sudo if it fails.");
        }

        let args = vec![
            "-pkg".to_string(),
            pkg.display().to_string(),
            "-target".to_string(),
            "/".to_string(),
        ];
        match self.runtime.run_command(Path::new("installer"), &args) {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(InstallError::Installer {
                path: pkg.to_path_buf(),
                message: format!("installer exited with {}", status),
            }),
            Err(e) => Err(InstallError::Installer {
                path: pkg.to_path_buf(),
                message: chain_message(&e),
            }),
        }
    }
}
