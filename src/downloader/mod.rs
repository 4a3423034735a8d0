//! Downloader module containing the download controller, its builder and configuration.
//!
//! This module provides the main [`Downloader`] struct and its associated builder
//! pattern. A downloader drives one transfer at a time: it validates the request,
//! streams the body into a temporary file, samples the speed, verifies the
//! checksum and moves the file into place.
//!
//! # Overview
//!
//! - `downloader` - Core Downloader struct and the completion protocol
//! - `builder` - DownloaderBuilder for configuring a downloader
//! - `config` - Configuration structures and callback types
//! - `sampler` - Periodic throughput sampling
//! - `events` - Events broadcast to subscribers
//! - `post_action` - What runs on a finished file
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use haul::download::DownloadRequest;
//! use haul::downloader::DownloaderBuilder;
//! use std::convert::TryFrom;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = DownloaderBuilder::new().build()?;
//! let request = DownloadRequest::try_from("https://example.com/file1.zip")?;
//!
//! downloader.start(request).await?;
//! if let Some(summary) = downloader.wait().await {
//!     println!("{}", summary.message());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Following Events
//!
//! ```rust,no_run
//! use haul::downloader::{DownloaderBuilder, Event};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = DownloaderBuilder::hidden().build()?;
//! let mut events = downloader.subscribe();
//! while let Ok(event) = events.recv().await {
//!     match event {
//!         Event::Progress(progress) => println!("{}", progress.title()),
//!         Event::Completed(summary) => {
//!             println!("{}", summary.status());
//!             break;
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod downloader;
pub mod events;
pub mod post_action;
pub mod sampler;

pub use builder::DownloaderBuilder;
pub use config::{DownloadCallback, DownloaderConfig, ProgressCallback};
pub use downloader::Downloader;
pub use events::Event;
pub use post_action::{OpenWithDefaultApp, PostAction};
pub use sampler::{record_sample, SpeedSampler};
