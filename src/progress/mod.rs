//! Progress reporting: the [`Progress`] snapshot delivered to subscribers and the
//! optional terminal surface drawn with `indicatif`.

pub(crate) mod display;
pub(crate) mod report;
pub(crate) mod style;

pub use display::ProgressDisplay;
pub use report::Progress;
pub use style::ProgressBarOpts;
