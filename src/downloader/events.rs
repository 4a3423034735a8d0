//! Notifications broadcast by the downloader.

use crate::download::Summary;
use crate::progress::Progress;

/// Message delivered to [`Downloader::subscribe`](super::Downloader::subscribe)
/// receivers.
#[derive(Debug, Clone)]
pub enum Event {
    Progress(Progress),
    /// Sent once per attempt, after the completion protocol ran.
    Completed(Summary),
}
