//! Error handling for the haul library.
//!
//! Errors fall in two groups. Request errors ([`Error::InvalidRequest`],
//! [`Error::AlreadyRunning`], [`Error::InvalidUrl`]) are returned synchronously
//! from [`Downloader::start`](crate::Downloader::start) and mean the transfer never
//! began. Everything else describes something that went wrong while a transfer was
//! running and is reported through the terminal [`Summary`](crate::Summary).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can happen when using haul.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from an underlying system.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Error from the underlying URL parser or the expected URL format.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request was rejected before any transfer started.
    ///
    /// Returned when the URL is unreachable, when the destination cannot be
    /// written, or when the expected hash is not a recognised digest.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A transfer is already in progress on this downloader.
    #[error("A download is already running")]
    AlreadyRunning,

    /// The server answered with a non-success status.
    #[error("Unexpected HTTP status {0}")]
    HttpStatus(reqwest::StatusCode),

    /// I/O Error.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    #[error("Reqwest Error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// Error raised by the middleware stack wrapping the HTTP client.
    #[error("Middleware Error")]
    Middleware {
        #[from]
        source: reqwest_middleware::Error,
    },

    /// The finished file was saved but could not be launched.
    #[error("Error trying to run downloaded file {}", path.display())]
    PostAction {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type alias for operations that can fail with a haul error.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Renders the error together with its source chain on a single line.
    pub fn detail(&self) -> String {
        let mut detail = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            detail.push_str(": ");
            detail.push_str(&err.to_string());
            source = err.source();
        }
        detail
    }
}
