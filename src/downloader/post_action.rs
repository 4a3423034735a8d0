//! What to do with a file once it has been saved.

use std::io;
use std::path::Path;

/// Action run on the destination path when a request sets `run_on_finish`.
pub trait PostAction: Send + Sync {
    fn launch(&self, path: &Path) -> io::Result<()>;
}

/// Opens the file with the platform's default handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenWithDefaultApp;

impl PostAction for OpenWithDefaultApp {
    fn launch(&self, path: &Path) -> io::Result<()> {
        open::that(path)
    }
}
