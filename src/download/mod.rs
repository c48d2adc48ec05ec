use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use std::path::Path;

use crate::error::{InstallError, chain_message};
use crate::http::HttpClient;
use crate::outcome::StepOutcome;
use crate::runtime::{RealRuntime, Runtime};

/// Transfers a remote resource to a local file.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download `url` to `dest`, returning the number of bytes written.
    async fn download(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// Downloader backed by [`HttpClient`], writing through a [`Runtime`].
pub struct HttpDownloader<R: Runtime = RealRuntime> {
    http_client: HttpClient,
    runtime: R,
}

impl HttpDownloader {
    pub fn new(http_client: HttpClient) -> Self {
        Self::with_runtime(http_client, RealRuntime)
    }
}

impl<R: Runtime> HttpDownloader<R> {
    pub fn with_runtime(http_client: HttpClient, runtime: R) -> Self {
        Self {
            http_client,
            runtime,
        }
    }

    pub fn http_client(&self) -> &HttpClient {
        &self.http_client
    }
}

#[async_trait]
impl<R: Runtime> Downloader for HttpDownloader<R> {
    #[tracing::instrument(skip(self))]
    async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        self.http_client
            .download_file(url, || {
                self.runtime
                    .create_file(dest)
                    .with_context(|| format!("Failed to create {}", dest.display()))
            })
            .await
    }
}

/// Make sure a file exists at `dest`, downloading it from `url` if needed.
///
/// An existing file is never downloaded again, whatever its content. Errors
/// are printed with the failing URL and returned as a failed outcome; a
/// partially written file is left in place.
#[tracing::instrument(skip(runtime, downloader))]
pub async fn fetch<R: Runtime, D: Downloader>(
    runtime: &R,
    downloader: &D,
    url: &str,
    dest: &Path,
) -> StepOutcome {
    if runtime.exists(dest) {
        println!("{} already exists. Skipping download.", dest.display());
        return StepOutcome::Skipped(format!("{} already exists", dest.display()));
    }

    println!("Downloading {} to {}", url, dest.display());
    match transfer(runtime, downloader, url, dest).await {
        Ok(bytes) => {
            debug!("Wrote {} bytes to {}", bytes, dest.display());
            println!("Downloaded {} successfully.", url);
            StepOutcome::Succeeded
        }
        Err(e) => {
            let error = InstallError::Network {
                url: url.to_string(),
                message: chain_message(&e),
            };
            println!("{}", error);
            StepOutcome::Failed(error)
        }
    }
}

async fn transfer<R: Runtime, D: Downloader>(
    runtime: &R,
    downloader: &D,
    url: &str,
    dest: &Path,
) -> Result<u64> {
    if let Some(parent) = dest.parent()
        && !parent.as_os_str().is_empty()
    {
        runtime.create_dir_all(parent)?;
    }
    downloader.download(url, dest).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use anyhow::anyhow;
    use mockall::predicate::eq;
    use reqwest::Client;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_fetch_skips_existing_destination() {
        let dest = PathBuf::from("/app/python/Windows/python.zip");

        let mut runtime = MockRuntime::new();
        runtime
            .expect_exists()
            .with(eq(dest.clone()))
            .returning(|_| true);

        // No expectations: any download attempt panics
        let downloader = MockDownloader::new();

        let outcome = fetch(&runtime, &downloader, "https://example.com/python.zip", &dest).await;

        assert!(matches!(outcome, StepOutcome::Skipped(_)));
    }

    #[tokio::test]
    async fn test_fetch_downloads_missing_destination() {
        let dest = PathBuf::from("/app/ffmpeg/Linux/ffmpeg.tar.xz");

        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);
        runtime
            .expect_create_dir_all()
            .with(eq(PathBuf::from("/app/ffmpeg/Linux")))
            .times(1)
            .returning(|_| Ok(()));

        let mut downloader = MockDownloader::new();
        downloader
            .expect_download()
            .withf(|url, dest| {
                url == "https://example.com/ffmpeg.tar.xz"
                    && dest == Path::new("/app/ffmpeg/Linux/ffmpeg.tar.xz")
            })
            .times(1)
            .returning(|_, _| Ok(42));

        let outcome = fetch(&runtime, &downloader, "https://example.com/ffmpeg.tar.xz", &dest).await;

        assert_eq!(outcome, StepOutcome::Succeeded);
    }

    #[tokio::test]
    async fn test_fetch_reports_network_error_with_url() {
        let dest = PathBuf::from("/app/python/Windows/python.zip");

        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);
        runtime.expect_create_dir_all().returning(|_| Ok(()));

        let mut downloader = MockDownloader::new();
        downloader
            .expect_download()
            .returning(|_, _| Err(anyhow!("connection reset")));

        let outcome = fetch(&runtime, &downloader, "https://example.com/python.zip", &dest).await;

        match outcome {
            StepOutcome::Failed(InstallError::Network { url, message }) => {
                assert_eq!(url, "https://example.com/python.zip");
                assert!(message.contains("connection reset"));
            }
            other => panic!("expected network failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_downloader_writes_through_runtime() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/python.zip")
            .with_status(200)
            .with_body("zip bytes")
            .create_async()
            .await;

        let mut runtime = MockRuntime::new();
        runtime
            .expect_create_file()
            .with(eq(PathBuf::from("python.zip")))
            .times(1)
            .returning(|_| Ok(Box::new(std::io::sink())));

        let downloader = HttpDownloader::with_runtime(HttpClient::new(Client::new()), runtime);
        let bytes = downloader
            .download(&format!("{}/python.zip", server.url()), Path::new("python.zip"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(bytes, 9);
    }

    #[tokio::test]
    async fn test_http_downloader_not_found() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/python.zip")
            .with_status(404)
            .create_async()
            .await;

        // No expectations: a created file would panic
        let runtime = MockRuntime::new();

        let downloader = HttpDownloader::with_runtime(HttpClient::new(Client::new()), runtime);
        let result = downloader
            .download(&format!("{}/python.zip", server.url()), Path::new("python.zip"))
            .await;

        mock.assert_async().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fetch_against_real_filesystem() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ffmpeg.7z")
            .with_status(200)
            .with_body("7z payload")
            .expect(1)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("ffmpeg/MacOs/ffmpeg.7z");
        let downloader = HttpDownloader::new(HttpClient::new(Client::new()));
        let url = format!("{}/ffmpeg.7z", server.url());

        let first = fetch(&RealRuntime, &downloader, &url, &dest).await;
        let second = fetch(&RealRuntime, &downloader, &url, &dest).await;

        mock.assert_async().await;
        assert_eq!(first, StepOutcome::Succeeded);
        assert!(matches!(second, StepOutcome::Skipped(_)));
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "7z payload");
    }
}
