//! Transfer state and the terminal download summary.

use super::request::DownloadRequest;
use std::fmt;
use std::path::PathBuf;

/// Lifecycle of a transfer attempt.
///
/// An attempt moves `Idle -> Downloading -> {terminal}` and never leaves a
/// terminal state until the next attempt starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Downloading,
    Succeeded,
    Failed,
    Cancelled,
    HashMismatch,
}

impl Status {
    /// Whether the attempt has ended.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Status::Succeeded | Status::Failed | Status::Cancelled | Status::HashMismatch
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Idle => "Idle",
            Status::Downloading => "Downloading",
            Status::Succeeded => "Succeeded",
            Status::Failed => "Failed",
            Status::Cancelled => "Cancelled",
            Status::HashMismatch => "HashMismatch",
        };
        f.write_str(name)
    }
}

/// Counters of the current (or last) attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferState {
    pub status: Status,
    pub bytes_received: u64,
    /// `None` until the transport reports a size. Never decreases once known.
    pub total_bytes: Option<u64>,
    pub bytes_per_second: u64,
    /// Byte count seen at the previous sampler tick, `None` before the first tick.
    pub last_sample_bytes: Option<u64>,
}

impl TransferState {
    /// Completion percentage, 0 while the total size is unknown.
    pub fn percent(&self) -> u8 {
        match self.total_bytes {
            Some(total) if total > 0 => {
                (self.bytes_received.saturating_mul(100) / total).min(100) as u8
            }
            _ => 0,
        }
    }

    pub(crate) fn record_progress(&mut self, bytes_received: u64, total_bytes: Option<u64>) {
        self.bytes_received = bytes_received;
        if let Some(total) = total_bytes {
            self.total_bytes = Some(self.total_bytes.map_or(total, |known| known.max(total)));
        }
    }
}

/// Terminal report of a transfer attempt.
#[derive(Debug, Clone)]
pub struct Summary {
    request: DownloadRequest,
    destination: PathBuf,
    status: Status,
    size: u64,
    error: Option<String>,
    post_action_error: Option<String>,
}

impl Summary {
    pub fn new(request: DownloadRequest, destination: PathBuf, size: u64) -> Self {
        Self {
            request,
            destination,
            status: Status::Idle,
            size,
            error: None,
            post_action_error: None,
        }
    }

    pub fn with_status(self, status: Status) -> Self {
        Self { status, ..self }
    }

    pub fn fail(self, msg: impl fmt::Display) -> Self {
        Self {
            status: Status::Failed,
            error: Some(msg.to_string()),
            ..self
        }
    }

    pub fn hash_mismatch(self, msg: impl fmt::Display) -> Self {
        Self {
            status: Status::HashMismatch,
            error: Some(msg.to_string()),
            ..self
        }
    }

    pub(crate) fn set_post_action_error(&mut self, msg: impl fmt::Display) {
        self.post_action_error = Some(msg.to_string());
    }

    pub fn request(&self) -> &DownloadRequest {
        &self.request
    }

    /// Final path of the file, whether or not it was written.
    pub fn destination(&self) -> &PathBuf {
        &self.destination
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Bytes received during the attempt.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Why the attempt failed, for `Failed` and `HashMismatch`.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Set when the file was saved but launching it failed.
    pub fn post_action_error(&self) -> Option<&str> {
        self.post_action_error.as_deref()
    }

    /// Status line describing the outcome.
    pub fn message(&self) -> String {
        match self.status {
            Status::Succeeded => format!("File downloaded successfully - {}", self.request.filename),
            Status::Cancelled => "Download cancelled".to_string(),
            Status::Failed | Status::HashMismatch => "Error downloading file".to_string(),
            Status::Idle | Status::Downloading => String::new(),
        }
    }
}
