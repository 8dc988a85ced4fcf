//! HTTP transport: catalog documents and streamed artifact downloads.
//!
//! Downloads land in a `*.part` staging file that is removed when dropped.
//! Anything left behind by an interrupted run is cleared by
//! [`sweep_stale_downloads`].

use std::path::Path;
use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

const STAGING_SUFFIX: &str = ".part";

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Thin wrapper over a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
}

impl Transport {
    /// Build a transport with the default user agent and timeouts.
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(crate::USER_AGENT)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, TransportError> {
        let resp = self.client.get(url).send().await?;
        match resp.status() {
            s if s.is_success() => Ok(resp),
            StatusCode::NOT_FOUND => Err(TransportError::NotFound(url.to_string())),
            s => Err(TransportError::Status {
                url: url.to_string(),
                status: s.as_u16(),
            }),
        }
    }

    /// Fetch a whole response body into memory.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Bytes, TransportError> {
        Ok(self.get(url).await?.bytes().await?)
    }

    /// Fetch and decode a JSON document.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, TransportError> {
        let body = self.fetch_bytes(url).await?;
        serde_json::from_slice(&body).map_err(|source| TransportError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// Stream `url` into `dest`, calling `on_progress(downloaded, total)` after
    /// every chunk. Returns the number of bytes written.
    pub async fn download(
        &self,
        url: &str,
        dest: &Path,
        mut on_progress: impl FnMut(u64, Option<u64>),
    ) -> Result<u64, TransportError> {
        let response = self.get(url).await?;
        let total = response.content_length();
        on_progress(0, total);

        let mut file = File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
            on_progress(downloaded, total);
        }

        file.flush().await?;
        file.sync_all().await?;
        tracing::debug!("Downloaded {downloaded} bytes from {url}");
        Ok(downloaded)
    }
}

/// Create a staging file for `name` inside `dir`.
pub fn staging_file(dir: &Path, name: &str) -> std::io::Result<NamedTempFile> {
    std::fs::create_dir_all(dir)?;
    tempfile::Builder::new()
        .prefix(&format!("{name}-"))
        .suffix(STAGING_SUFFIX)
        .tempfile_in(dir)
}

/// Remove leftover `*.part` files from `dir`. Returns how many were deleted.
pub fn sweep_stale_downloads(dir: &Path) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        let is_partial = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(STAGING_SUFFIX));
        if is_partial && path.is_file() {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => tracing::debug!("Could not remove {}: {e}", path.display()),
            }
        }
    }
    removed
}
