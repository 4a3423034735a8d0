//! Download module containing the request, status and integrity types.
//!
//! - [`request`] - [`DownloadRequest`], the immutable description of a transfer
//! - [`summary`] - [`Status`], [`TransferState`] and the terminal [`Summary`]
//! - [`hash`] - file integrity verification through streaming digests
//!
//! # Examples
//!
//! ```rust
//! use haul::download::{DownloadRequest, Status};
//! use std::convert::TryFrom;
//!
//! let request = DownloadRequest::try_from("https://example.com/file.zip")?
//!     .with_hash("d41d8cd98f00b204e9800998ecf8427e")
//!     .headless(true);
//! assert!(!Status::Downloading.is_terminal());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod hash;
pub mod request;
pub mod summary;

pub use hash::{compare, detect_hash_type, hash_file, HashType};
pub use request::{is_plain_filename, DownloadRequest};
pub use summary::{Status, Summary, TransferState};
