//! Builder pattern implementation for creating Downloader instances.
//!
//! # Examples
//!
//! ```rust
//! use haul::downloader::DownloaderBuilder;
//! use std::path::PathBuf;
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), haul::Error> {
//! let downloader = DownloaderBuilder::new()
//!     .directory(PathBuf::from("./downloads"))
//!     .sample_period(Duration::from_millis(500))
//!     .on_complete(|summary| println!("{}", summary.message()))
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Hidden Progress Bar
//!
//! ```rust
//! use haul::downloader::DownloaderBuilder;
//!
//! # fn example() -> Result<(), haul::Error> {
//! let downloader = DownloaderBuilder::hidden().build()?;
//! # Ok(())
//! # }
//! ```

use super::{
    config::DownloaderConfig, downloader::Downloader, post_action::PostAction,
};
use crate::download::Summary;
use crate::http::{create_http_client, HttpTransport, Transport};
use crate::logging::Logger;
use crate::progress::{Progress, ProgressBarOpts};
use crate::Result;

use reqwest::header::{HeaderMap, HeaderValue, IntoHeaderName};
use reqwest::Proxy;
use std::{path::PathBuf, sync::Arc, time::Duration};

/// A builder used to create a [`Downloader`].
///
/// ```rust
/// # fn main() -> Result<(), haul::Error> {
/// use haul::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().probe(false).build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct DownloaderBuilder {
    config: DownloaderConfig,
}

impl DownloaderBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        DownloaderBuilder::default()
    }

    /// Convenience function to hide the progress bar.
    pub fn hidden() -> Self {
        let mut builder = DownloaderBuilder::default();
        builder.config.style = ProgressBarOpts::hidden();
        builder
    }

    /// Sets the directory where to store the downloads.
    pub fn directory(mut self, directory: PathBuf) -> Self {
        self.config.directory = directory;
        self
    }

    /// Enables or disables the reachability check performed by `start`.
    pub fn probe(mut self, probe: bool) -> Self {
        self.config.probe = probe;
        self
    }

    /// Sets the interval between two speed samples.
    pub fn sample_period(mut self, period: Duration) -> Self {
        self.config.sample_period = period;
        self
    }

    /// Set the progress bar style.
    pub fn style(mut self, style: ProgressBarOpts) -> Self {
        self.config.style = style;
        self
    }

    /// Capacity of the channel returned by [`Downloader::subscribe`].
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.config.event_capacity = capacity.max(1);
        self
    }

    /// Route requests through a proxy.
    pub fn proxy(mut self, proxy: Proxy) -> Self {
        self.config.http.proxy = Some(proxy);
        self
    }

    /// Overrides the default `haul/<version>` user agent.
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.config.http.user_agent = Some(user_agent.to_string());
        self
    }

    /// Bounds the time spent connecting to the server.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.http.connect_timeout = Some(timeout);
        self
    }

    fn new_header(&self) -> HeaderMap {
        match self.config.http.headers {
            Some(ref h) => h.to_owned(),
            _ => HeaderMap::new(),
        }
    }

    /// Add the http headers.
    ///
    /// You need to pass in a `HeaderMap`, not a `HeaderName`.
    /// `HeaderMap` is a set of http headers.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let mut new = self.new_header();
        new.extend(headers);

        self.config.http.headers = Some(new);
        self
    }

    /// Add the http header
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        let mut new = self.new_header();

        new.insert(name, value);

        self.config.http.headers = Some(new);
        self
    }

    /// Set a callback invoked on every progress update.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Progress) + Send + Sync + 'static,
    {
        self.config.on_progress = Some(Arc::new(Box::new(callback)));
        self
    }

    /// Set a callback invoked once per attempt with its terminal summary.
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Summary) + Send + Sync + 'static,
    {
        self.config.on_complete = Some(Arc::new(Box::new(callback)));
        self
    }

    /// Use a custom transport instead of the built-in HTTP one.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.config.transport = Some(transport);
        self
    }

    /// Set the logging sink.
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.config.logger = logger;
        self
    }

    /// Set the action run on files of requests with `run_on_finish`.
    pub fn post_action(mut self, post_action: Arc<dyn PostAction>) -> Self {
        self.config.post_action = post_action;
        self
    }

    /// Create the [`Downloader`] with the specified options.
    ///
    /// Fails when the HTTP client cannot be created.
    pub fn build(self) -> Result<Downloader> {
        let transport: Arc<dyn Transport> = match self.config.transport {
            Some(ref transport) => transport.clone(),
            None => Arc::new(HttpTransport::new(create_http_client(
                self.config.http.clone(),
            )?)),
        };
        Ok(Downloader::new(self.config, transport))
    }
}
