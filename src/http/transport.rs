//! The byte-moving half of a download.
//!
//! A [`Transport`] performs a GET, writes the body incrementally to a path and
//! reports progress. It resolves to exactly one [`Outcome`]. Cancellation is
//! cooperative: the token is checked between chunks, and a transport that
//! observes it reports [`Outcome::Cancelled`] rather than an error.

use crate::error::{Error, Result};
use crate::utils::total_size;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use std::fmt;
use std::path::Path;
use tokio::{fs::File, io::AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Terminal result of [`Transport::fetch`].
#[derive(Debug)]
pub enum Outcome {
    /// The whole body was written to the destination.
    Completed,
    /// The cancellation token was observed before the body ended.
    Cancelled,
    /// The transfer stopped on an error.
    Failed(Error),
}

/// Capability required from the HTTP layer.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues a request and succeeds on a success-class response. The body is
    /// not read.
    async fn probe(&self, url: &Url) -> Result<()>;

    /// Streams `url` into `destination`, calling `progress(received, total)` as
    /// bytes arrive.
    async fn fetch(
        &self,
        url: &Url,
        destination: &Path,
        cancel: CancellationToken,
        progress: &(dyn Fn(u64, Option<u64>) + Send + Sync),
    ) -> Outcome;
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Clone)]
pub struct HttpTransport {
    client: ClientWithMiddleware,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

impl HttpTransport {
    pub fn new(client: ClientWithMiddleware) -> Self {
        Self { client }
    }

    /// Returns `Ok(false)` when cancelled.
    async fn stream_to(
        &self,
        url: &Url,
        destination: &Path,
        cancel: &CancellationToken,
        progress: &(dyn Fn(u64, Option<u64>) + Send + Sync),
    ) -> Result<bool> {
        debug!("Fetching {}", url);
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(false),
            response = self.client.get(url.as_str()).send() => response?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status));
        }

        let total = total_size(&response);
        progress(0, total);

        debug!("Creating destination file {:?}", destination);
        let mut file = File::create(destination).await?;
        let mut received: u64 = 0;

        debug!("Retrieving chunks...");
        let mut stream = response.bytes_stream();
        loop {
            let item = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    // Let pending writes settle so the file can be removed.
                    let _ = file.flush().await;
                    return Ok(false);
                }
                item = stream.next() => item,
            };
            let Some(item) = item else {
                break;
            };
            let chunk = item?;
            file.write_all(&chunk).await?;
            received += chunk.len() as u64;
            progress(received, total);
        }

        file.flush().await?;
        Ok(true)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn probe(&self, url: &Url) -> Result<()> {
        debug!("Probing {}", url);
        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();
        drop(response);

        if status.is_success() {
            Ok(())
        } else {
            Err(Error::HttpStatus(status))
        }
    }

    async fn fetch(
        &self,
        url: &Url,
        destination: &Path,
        cancel: CancellationToken,
        progress: &(dyn Fn(u64, Option<u64>) + Send + Sync),
    ) -> Outcome {
        match self.stream_to(url, destination, &cancel, progress).await {
            Ok(true) => Outcome::Completed,
            Ok(false) => Outcome::Cancelled,
            Err(_) if cancel.is_cancelled() => Outcome::Cancelled,
            Err(e) => Outcome::Failed(e),
        }
    }
}
