//! HTTP client used for artifact downloads.

use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use std::io::Write;

/// Thin wrapper over a reqwest client that streams response bodies to a writer.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Downloads `url` into the writer returned by `create_writer`.
    ///
    /// The writer is only created once the server answered with a success
    /// status, so an HTTP error never leaves an empty file behind. Bytes
    /// already written when the stream breaks stay where they are.
    #[tracing::instrument(skip(self, create_writer))]
    pub async fn download_file<W, F>(&self, url: &str, create_writer: F) -> Result<u64>
    where
        W: Write,
        F: FnOnce() -> Result<W>,
    {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to start download request")?;

        let mut response = response
            .error_for_status()
            .context("Server returned an error status")?;

        let mut writer = create_writer()?;
        let mut downloaded_bytes: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .context("Failed to read chunk from download stream")?
        {
            writer
                .write_all(&chunk)
                .context("Failed to write chunk to file")?;
            downloaded_bytes += chunk.len() as u64;
        }
        writer.flush().context("Failed to flush downloaded file")?;

        debug!(
            "Downloaded {:.2} MB",
            downloaded_bytes as f64 / (1024.0 * 1024.0)
        );

        Ok(downloaded_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Writer that keeps everything in a shared buffer so tests can inspect it.
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_download_file_streams_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ffmpeg.7z")
            .with_status(200)
            .with_body("archive bytes")
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();

        let bytes = client
            .download_file(&format!("{}/ffmpeg.7z", server.url()), move || Ok(writer))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(bytes, 13);
        assert_eq!(buffer.0.lock().unwrap().as_slice(), b"archive bytes");
    }

    #[tokio::test]
    async fn test_download_file_error_status_does_not_create_writer() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/missing.zip")
            .with_status(404)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let result = client
            .download_file(&format!("{}/missing.zip", server.url()), || -> Result<SharedBuffer> {
                panic!("writer must not be created for an error response")
            })
            .await;

        mock.assert_async().await;
        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("404"));
    }

    #[tokio::test]
    async fn test_download_file_single_attempt() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/flaky.zip")
            .with_status(503)
            .expect(1)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let result = client
            .download_file(&format!("{}/flaky.zip", server.url()), || {
                Ok(SharedBuffer::default())
            })
            .await;

        mock.assert_async().await;
        assert!(result.is_err());
    }
}
