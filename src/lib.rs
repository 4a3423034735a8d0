//! Haul is a crate providing a simple way to download a single file
//! asynchronously via HTTP(S), with progress, cancellation and checksum
//! verification.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use haul::{download::DownloadRequest, downloader::DownloaderBuilder, Error};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! let reqwest_rs = "https://github.com/seanmonstar/reqwest/archive/refs/tags/v0.11.9.zip";
//! let request = DownloadRequest::try_from(reqwest_rs)?.run_on_finish(false);
//! let downloader = DownloaderBuilder::new()
//!     .directory(PathBuf::from("output"))
//!     .build()?;
//! downloader.start(request).await?;
//! downloader.wait().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`download`] - The `DownloadRequest`, the status types and hash verification
//! - [`downloader`] - The `Downloader` controller and its `DownloaderBuilder`
//! - [`error`] - Centralized error handling with the `Error` enum
//! - [`http`] - HTTP client creation and the `Transport` capability
//! - [`logging`] - The `Logger` sink used for lifecycle messages
//! - [`progress`] - Progress snapshots and the terminal progress bar
//! - [`utils`] - Shared utility functions

pub mod download;
pub mod downloader;
pub mod error;
pub mod http;
pub mod logging;
pub mod progress;
pub mod utils;

pub use download::{compare, detect_hash_type, hash_file, HashType};
pub use download::{DownloadRequest, Status, Summary, TransferState};
pub use downloader::{Downloader, DownloaderBuilder, Event, PostAction};
pub use error::{Error, Result};
pub use http::{create_http_client, HttpClientConfig, HttpTransport, Outcome, Transport};
pub use logging::{Logger, TracingLogger};
pub use progress::{Progress, ProgressBarOpts};
pub use utils::{format_size, format_speed, parse_content_range_total};
