//! Terminal surface showing the transfer.

use super::report::Progress;
use super::style::ProgressBarOpts;
use crate::download::DownloadRequest;
use indicatif::ProgressBar;

/// A single progress bar following one transfer attempt.
///
/// Headless requests get a hidden bar, so callers never need to branch on it.
#[derive(Debug, Clone)]
pub struct ProgressDisplay {
    bar: ProgressBar,
    clear: bool,
}

impl ProgressDisplay {
    pub fn new(opts: &ProgressBarOpts, request: &DownloadRequest) -> Self {
        let bar = if request.headless {
            ProgressBar::hidden()
        } else {
            opts.clone().to_progress_bar(None)
        };
        bar.set_prefix(request.filename.clone());
        bar.set_message(format!(
            "{} from {}",
            request.filename,
            request.source_location()
        ));

        Self {
            bar,
            clear: request.close_on_finish || opts.clear,
        }
    }

    pub fn update(&self, progress: &Progress) {
        if let Some(total) = progress.total_bytes {
            self.bar.set_length(total);
        }
        self.bar.set_position(progress.bytes_received);
        self.bar.set_message(progress.label());
    }

    /// Ends the bar, clearing it when the request asked to close on finish.
    pub fn finish(&self, message: String) {
        if self.clear {
            self.bar.finish_and_clear();
        } else {
            self.bar.finish_with_message(message);
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}
