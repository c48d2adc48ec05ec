//! Dependency bootstrapping.
//!
//! [`run`] detects the platform, then runs the Python pipeline followed by
//! the FFmpeg pipeline. Each pipeline checks whether the tool is already
//! there, downloads its artifact and unpacks or installs it. Failures are
//! printed and recorded in the [`Summary`]; they never abort the run.

use anyhow::Result;
use log::{info, warn};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::{
    archive::{ArchiveInstaller, TarXzExtractor},
    download::Downloader,
    error::InstallError,
    outcome::Summary,
    platform::Os,
    runtime::Runtime,
};

mod config;
mod layout;
mod pipeline;
mod sources;

pub use config::{Config, Options};
pub use layout::{DEFAULT_ROOT, Layout};
pub use sources::{FFMPEG_URL_ENV, PYTHON_URL_ENV, Sources, default_url};

/// Third-party tools the application needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dependency {
    Python,
    Ffmpeg,
}

impl Dependency {
    pub const fn dir_name(&self) -> &'static str {
        match self {
            Dependency::Python => "python",
            Dependency::Ffmpeg => "ffmpeg",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Dependency::Python => "Python",
            Dependency::Ffmpeg => "FFmpeg",
        }
    }

    /// Command probed to decide whether the tool is already installed.
    pub const fn command(&self, os: Os) -> &'static str {
        match (self, os) {
            (Dependency::Python, Os::MacOs | Os::Linux) => "python3",
            (Dependency::Python, Os::Windows) => "python",
            (Dependency::Ffmpeg, _) => "ffmpeg",
        }
    }

    /// Argument that makes the command print its version and exit.
    pub const fn version_arg(&self) -> &'static str {
        match self {
            Dependency::Python => "--version",
            Dependency::Ffmpeg => "-version",
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

/// Runs the install pipelines for the detected platform.
pub struct Bootstrapper<R: Runtime, D: Downloader> {
    runtime: R,
    downloader: D,
    archives: ArchiveInstaller,
    tar_xz: TarXzExtractor,
    layout: Layout,
    sources: Sources,
    force: bool,
}

impl<R: Runtime, D: Downloader> Bootstrapper<R, D> {
    pub fn new(runtime: R, downloader: D, layout: Layout, sources: Sources, force: bool) -> Self {
        Self {
            runtime,
            downloader,
            archives: ArchiveInstaller::new(),
            tar_xz: TarXzExtractor,
            layout,
            sources,
            force,
        }
    }

    /// Detect the platform from `os_name` and install everything it needs.
    ///
    /// An unsupported platform prints a single message and does nothing else.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self, os_name: &str) -> Summary {
        let mut summary = Summary::default();

        let Some(os) = Os::detect(os_name) else {
            println!("{}", InstallError::UnsupportedOs(os_name.to_lowercase()));
            return summary;
        };

        if os != Os::Linux {
            println!("Detected {}. Installing dependencies...", os);
        }

        let python = self.install_python(os).await;
        summary.push(Dependency::Python, os, python);

        let ffmpeg = self.install_ffmpeg(os).await;
        summary.push(Dependency::Ffmpeg, os, ffmpeg);

        summary
    }

    /// Write the summary as JSON. Problems are reported, not returned.
    pub fn write_report(&self, path: &Path, summary: &Summary) {
        let written = summary
            .to_json()
            .map_err(anyhow::Error::from)
            .and_then(|json| self.runtime.write(path, json.as_bytes()));
        if let Err(e) = written {
            warn!("Failed to write report to {}: {:#}", path.display(), e);
            println!("Could not write report to {}: {:#}", path.display(), e);
        }
    }
}

/// Build the default configuration and run the bootstrapper.
#[tracing::instrument(skip(runtime, install_root, options))]
pub async fn bootstrap<R: Runtime>(
    runtime: R,
    install_root: Option<PathBuf>,
    options: Options,
) -> Result<Summary> {
    let config = Config::new(runtime, install_root, options)?;
    run(config).await
}

#[tracing::instrument(skip(config))]
pub async fn run<R: Runtime, D: Downloader>(config: Config<R, D>) -> Result<Summary> {
    let Config {
        runtime,
        downloader,
        layout,
        sources,
        options,
    } = config;

    let os_name = match options.os_override {
        Some(name) => name,
        None => runtime.os_name(),
    };

    let bootstrapper = Bootstrapper::new(runtime, downloader, layout, sources, options.force);
    let summary = bootstrapper.run(&os_name).await;
    summary.print();
    info!(
        "{} pipeline(s) run, {} failed",
        summary.reports.len(),
        summary.failures()
    );

    if let Some(path) = options.report {
        bootstrapper.write_report(&path, &summary);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::MockDownloader;
    use crate::runtime::MockRuntime;
    use crate::test_utils::test_root;
    use mockall::predicate::eq;

    #[test]
    fn test_dependency_commands() {
        assert_eq!(Dependency::Python.command(Os::MacOs), "python3");
        assert_eq!(Dependency::Python.command(Os::Windows), "python");
        assert_eq!(Dependency::Ffmpeg.command(Os::Linux), "ffmpeg");
        assert_eq!(Dependency::Ffmpeg.version_arg(), "-version");
        assert_eq!(Dependency::Python.version_arg(), "--version");
        assert_eq!(Dependency::Ffmpeg.to_string(), "ffmpeg");
    }

    #[tokio::test]
    async fn test_unsupported_os_does_nothing() {
        // No expectations: any probe, download or file access panics
        let runtime = MockRuntime::new();
        let downloader = MockDownloader::new();
        let bootstrapper = Bootstrapper::new(
            runtime,
            downloader,
            Layout::new(test_root()),
            Sources::default(),
            false,
        );

        let summary = bootstrapper.run("FreeBSD").await;

        assert!(summary.is_empty());
    }

    #[tokio::test]
    async fn test_run_uses_os_override() {
        let runtime = MockRuntime::new();
        let config = Config {
            runtime,
            downloader: MockDownloader::new(),
            layout: Layout::new(test_root()),
            sources: Sources::default(),
            options: Options {
                os_override: Some("SunOS".into()),
                ..Options::default()
            },
        };

        let summary = run(config).await.unwrap();

        assert!(summary.is_empty());
    }

    #[tokio::test]
    async fn test_run_writes_report() {
        let report = test_root().join("report.json");

        let mut runtime = MockRuntime::new();
        runtime.expect_os_name().returning(|| "Plan9".to_string());
        runtime
            .expect_write()
            .withf(move |path, contents| path == report.as_path() && contents == b"[]")
            .times(1)
            .returning(|_, _| Ok(()));

        let config = Config {
            runtime,
            downloader: MockDownloader::new(),
            layout: Layout::new(test_root()),
            sources: Sources::default(),
            options: Options {
                report: Some(test_root().join("report.json")),
                ..Options::default()
            },
        };

        let summary = run(config).await.unwrap();
        assert!(summary.is_empty());
    }

    #[test]
    fn test_report_failure_is_not_fatal() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_write()
            .with(eq(test_root().join("report.json")), mockall::predicate::always())
            .returning(|_, _| Err(anyhow::anyhow!("read-only file system")));

        let bootstrapper = Bootstrapper::new(
            runtime,
            MockDownloader::new(),
            Layout::new(test_root()),
            Sources::default(),
            false,
        );

        bootstrapper.write_report(&test_root().join("report.json"), &Summary::default());
    }
}
