//! Configuration structures and defaults for the downloader.
//!
//! # Examples
//!
//! ```rust
//! use haul::downloader::{DownloadCallback, ProgressCallback};
//! use haul::download::{Status, Summary};
//! use haul::progress::Progress;
//!
//! let on_progress: ProgressCallback = Box::new(|progress: &Progress| {
//!     println!("{}", progress.label());
//! });
//! let on_complete: DownloadCallback = Box::new(|summary: &Summary| {
//!     match summary.status() {
//!         Status::Succeeded => println!("✓ Downloaded: {}", summary.request().filename),
//!         status => println!("✗ {}: {}", status, summary.error().unwrap_or_default()),
//!     }
//! });
//! ```

use super::post_action::{OpenWithDefaultApp, PostAction};
use crate::download::Summary;
use crate::http::{HttpClientConfig, Transport};
use crate::logging::{Logger, TracingLogger};
use crate::progress::{Progress, ProgressBarOpts};

use std::env::current_dir;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Callback type for progress events
pub type ProgressCallback = Box<dyn Fn(&Progress) + Send + Sync>;

/// Callback type for download completion events
pub type DownloadCallback = Box<dyn Fn(&Summary) + Send + Sync>;

/// Configuration structure for the downloader
#[derive(Clone)]
pub struct DownloaderConfig {
    /// Directory where to store the downloaded files.
    pub directory: PathBuf,
    /// Check that the URL answers before starting the transfer.
    pub probe: bool,
    /// Interval between two speed samples.
    pub sample_period: Duration,
    /// Settings of the default HTTP transport.
    pub http: HttpClientConfig,
    /// Progress bar style for non-headless requests.
    pub style: ProgressBarOpts,
    /// Capacity of the broadcast channel behind `subscribe`.
    pub event_capacity: usize,
    /// Callback for every progress update.
    pub on_progress: Option<Arc<ProgressCallback>>,
    /// Callback for when the download completes.
    pub on_complete: Option<Arc<DownloadCallback>>,
    /// Replaces the HTTP transport built from `http`.
    pub transport: Option<Arc<dyn Transport>>,
    pub logger: Arc<dyn Logger>,
    pub post_action: Arc<dyn PostAction>,
}

impl fmt::Debug for DownloaderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloaderConfig")
            .field("directory", &self.directory)
            .field("probe", &self.probe)
            .field("sample_period", &self.sample_period)
            .field("http", &self.http)
            .field("style", &self.style)
            .field("event_capacity", &self.event_capacity)
            .field("on_progress", &self.on_progress.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .field("transport", &self.transport.is_some())
            .finish()
    }
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            directory: current_dir().unwrap_or_default(),
            probe: true,
            sample_period: Duration::from_secs(1),
            http: HttpClientConfig::default(),
            style: ProgressBarOpts::default(),
            event_capacity: 64,
            on_progress: None,
            on_complete: None,
            transport: None,
            logger: Arc::new(TracingLogger),
            post_action: Arc::new(OpenWithDefaultApp),
        }
    }
}
