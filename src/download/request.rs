//! The description of a file to download.
//!
//! # Examples
//!
//! ```rust
//! use haul::download::DownloadRequest;
//! use std::convert::TryFrom;
//!
//! // Create from URL string (filename extracted automatically)
//! let request = DownloadRequest::try_from("https://example.com/file.zip")?;
//! assert_eq!(request.filename, "file.zip");
//! assert_eq!(request.temp_filename(), "file.download");
//!
//! // Override the filename and ask for a checksum
//! let request = request
//!     .with_filename("archive.zip")
//!     .with_hash("d41d8cd98f00b204e9800998ecf8427e");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::error::Error;

use reqwest::Url;
use std::convert::TryFrom;
use std::path::{Component, Path};

/// Extension given to the in-progress file.
pub const TEMP_EXTENSION: &str = "download";

/// Represents a file to be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// URL of the file to download.
    pub url: Url,
    /// File name used to save the file on disk.
    pub filename: String,
    /// Expected hex digest of the file (MD5 or SHA-256).
    pub hash: Option<String>,
    /// Hide the progress surface once the transfer ends.
    pub close_on_finish: bool,
    /// Launch the saved file once the transfer succeeded.
    pub run_on_finish: bool,
    /// Run without a progress surface; notifications are still delivered.
    pub headless: bool,
}

impl DownloadRequest {
    /// Creates a new [`DownloadRequest`] saved under `filename`.
    ///
    /// When using [`DownloadRequest::try_from`], the file name is extracted from
    /// the URL instead.
    pub fn new(url: &Url, filename: &str) -> Self {
        Self {
            url: url.clone(),
            filename: String::from(filename),
            hash: None,
            close_on_finish: false,
            run_on_finish: false,
            headless: false,
        }
    }

    /// Replaces the file name. An empty name keeps the current one.
    pub fn with_filename(mut self, filename: &str) -> Self {
        if !filename.is_empty() {
            self.filename = String::from(filename);
        }
        self
    }

    /// Sets the digest the downloaded file must match. An empty hash disables
    /// verification.
    pub fn with_hash(mut self, hash: &str) -> Self {
        let hash = hash.trim();
        self.hash = (!hash.is_empty()).then(|| hash.to_lowercase());
        self
    }

    pub fn close_on_finish(mut self, close_on_finish: bool) -> Self {
        self.close_on_finish = close_on_finish;
        self
    }

    pub fn run_on_finish(mut self, run_on_finish: bool) -> Self {
        self.run_on_finish = run_on_finish;
        self
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Name of the in-progress file: the final name's stem plus `.download`.
    ///
    /// Never equal to the final name. A file already ending in `.download`
    /// gets the extension appended instead.
    pub fn temp_filename(&self) -> String {
        let stem = Path::new(&self.filename)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.filename.clone());
        let temp = format!("{}.{}", stem, TEMP_EXTENSION);
        if temp.eq_ignore_ascii_case(&self.filename) {
            format!("{}.{}", self.filename, TEMP_EXTENSION)
        } else {
            temp
        }
    }

    /// Where the file is fetched from, without the file name itself.
    pub fn source_location(&self) -> String {
        let mut base = self.url.clone();
        if let Ok(mut segments) = base.path_segments_mut() {
            segments.pop().push("");
        }
        base.set_query(None);
        base.set_fragment(None);
        base.to_string()
    }
}

/// Whether `name` is a single file name, free of separators and of `.`/`..`.
pub fn is_plain_filename(name: &str) -> bool {
    if name.contains(['/', '\\', '\0']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

impl TryFrom<&Url> for DownloadRequest {
    type Error = crate::error::Error;

    fn try_from(value: &Url) -> Result<Self, Self::Error> {
        let filename = value
            .path_segments()
            .ok_or_else(|| {
                Error::InvalidUrl(format!(
                    "The url \"{}\" does not contain a valid path",
                    value
                ))
            })?
            .next_back()
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                form_urlencoded::parse(segment.as_bytes())
                    .map(|(key, val)| [key, val].concat())
                    .collect::<String>()
            })
            .ok_or_else(|| {
                Error::InvalidUrl(format!("The url \"{}\" does not contain a filename", value))
            })?;

        if !is_plain_filename(&filename) {
            return Err(Error::InvalidUrl(format!(
                "The url \"{}\" names an unusable file: {:?}",
                value, filename
            )));
        }
        Ok(DownloadRequest::new(value, &filename))
    }
}

impl TryFrom<&str> for DownloadRequest {
    type Error = crate::error::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Url::parse(value)
            .map_err(|e| {
                Error::InvalidUrl(format!("The url \"{}\" cannot be parsed: {}", value, e))
            })
            .and_then(|u| DownloadRequest::try_from(&u))
    }
}
