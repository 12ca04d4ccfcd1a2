use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use sha1::{Digest, Sha1};
use tracing::debug;

use crate::core::error::{UpdaterError, UpdaterResult};

/// Anything that can turn a release URL into bytes. The packager only talks
/// to this trait so tests can run without a network.
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    async fn fetch(&self, url: &str, sha1: Option<&str>) -> UpdaterResult<Vec<u8>>;
}

/// Streaming, SHA-1 validated downloader over the shared HTTP client.
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArtifactFetcher for Downloader {
    /// Download `url` into memory, hashing while the body streams in.
    async fn fetch(&self, url: &str, sha1: Option<&str>) -> UpdaterResult<Vec<u8>> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpdaterError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut bytes = Vec::with_capacity(initial_capacity(response.content_length()));
        let mut hasher = Sha1::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            hasher.update(&chunk);
            bytes.extend_from_slice(&chunk);
        }

        if let Some(expected) = sha1 {
            verify_sha1(url, expected, &hex::encode(hasher.finalize()))?;
        }

        debug!("Downloaded {} ({} bytes)", url, bytes.len());
        Ok(bytes)
    }
}

/// Upper bound on what a `Content-Length` header can pre-allocate.
const MAX_PREALLOCATION: u64 = 64 * 1024 * 1024;

fn initial_capacity(content_length: Option<u64>) -> usize {
    content_length.unwrap_or(0).min(MAX_PREALLOCATION) as usize
}

fn verify_sha1(file: &str, expected: &str, actual: &str) -> UpdaterResult<()> {
    if actual.eq_ignore_ascii_case(expected.trim()) {
        return Ok(());
    }
    Err(UpdaterError::Sha1Mismatch {
        file: file.to_string(),
        expected: expected.to_string(),
        actual: actual.to_string(),
    })
}
