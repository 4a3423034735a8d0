//! Progress bar styling.

use indicatif::{ProgressBar, ProgressStyle};

/// Define the options for a progress bar.
#[derive(Debug, Clone)]
pub struct ProgressBarOpts {
    /// Progress bar template string.
    template: Option<String>,
    /// Progression characters set.
    ///
    /// There must be at least 3 characters for the following states:
    /// "filled", "current", and "to do".
    progress_chars: Option<String>,
    /// Enable or disable the progress bar.
    pub(crate) enabled: bool,
    /// Clear the progress bar once completed.
    pub(crate) clear: bool,
}

impl Default for ProgressBarOpts {
    fn default() -> Self {
        Self {
            template: Some(ProgressBarOpts::TEMPLATE_DOWNLOAD.into()),
            progress_chars: Some(ProgressBarOpts::CHARS_LINE.into()),
            enabled: true,
            clear: false,
        }
    }
}

impl ProgressBarOpts {
    /// File name, bar, percentage and the downloader's own progress label.
    pub const TEMPLATE_DOWNLOAD: &'static str =
        "{prefix:.bold} {bar:40.green/black} {percent:>3}% {wide_msg}";
    /// Template representing the bar and its position.
    pub const TEMPLATE_BAR_WITH_POSITION: &'static str =
        "{bar:40.blue} {pos:>}/{len} ({percent}%) eta {eta_precise:.blue}";
    /// Use fine blocks as progress characters: `"█▉▊▋▌▍▎▏  "`.
    pub const CHARS_FINE: &'static str = "█▉▊▋▌▍▎▏  ";
    /// Use a line as progress characters: `"━╾╴─"`.
    pub const CHARS_LINE: &'static str = "━╾╴─";

    /// Create a new [`ProgressBarOpts`].
    pub fn new(
        template: Option<String>,
        progress_chars: Option<String>,
        enabled: bool,
        clear: bool,
    ) -> Self {
        Self {
            template,
            progress_chars,
            enabled,
            clear,
        }
    }

    /// Create a [`ProgressStyle`] based on the provided options.
    ///
    /// An invalid template falls back to the default bar.
    pub fn to_progress_style(self) -> ProgressStyle {
        let mut style = ProgressStyle::default_bar();
        if let Some(template) = self.template {
            style = style.template(&template).unwrap_or_else(|e| {
                tracing::warn!("Invalid progress template {:?}: {}", template, e);
                ProgressStyle::default_bar()
            });
        }
        if let Some(progress_chars) = self.progress_chars {
            style = style.progress_chars(&progress_chars);
        }
        style
    }

    /// Create a [`ProgressBar`] based on the provided options.
    ///
    /// The length stays open until the transport reports a size.
    pub fn to_progress_bar(self, len: Option<u64>) -> ProgressBar {
        // Return a hidden Progress bar if we disabled it.
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let style = self.to_progress_style();
        match len {
            Some(len) => ProgressBar::new(len),
            None => ProgressBar::no_length(),
        }
        .with_style(style)
    }

    /// Set to `true` to clear the progress bar upon completion.
    pub fn set_clear(&mut self, clear: bool) {
        self.clear = clear;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Create a new [`ProgressBarOpts`] which hides the progress bar.
    pub fn hidden() -> Self {
        Self {
            enabled: false,
            ..ProgressBarOpts::default()
        }
    }
}
