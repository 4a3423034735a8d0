//! Logging sink injected into the downloader.
//!
//! The downloader reports lifecycle messages through a [`Logger`] handed to it at
//! construction. [`TracingLogger`] forwards them to `tracing`; tests can swap in a
//! recording implementation.

use std::error::Error as StdError;
use tracing::{error, info};

/// Append-only, leveled sink for human readable messages.
pub trait Logger: Send + Sync {
    fn info(&self, message: &str);

    fn error(&self, message: &str, error: Option<&(dyn StdError + 'static)>);

    /// Records an unexpected error with its full source chain.
    fn exception(&self, error: &(dyn StdError + 'static));
}

/// [`Logger`] emitting `tracing` events under the `haul` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        info!(target: "haul", "{}", message);
    }

    fn error(&self, message: &str, err: Option<&(dyn StdError + 'static)>) {
        match err {
            Some(err) => error!(target: "haul", "{}: {}", message, err),
            None => error!(target: "haul", "{}", message),
        }
    }

    fn exception(&self, err: &(dyn StdError + 'static)) {
        let mut chain = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push_str(": ");
            chain.push_str(&cause.to_string());
            source = cause.source();
        }
        error!(target: "haul", "EXCEPTION: {}", chain);
    }
}
