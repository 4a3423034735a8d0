//! Shared utility functions.

pub mod content_length;
pub mod size;

pub use content_length::{parse_content_range_total, total_size};
pub use size::{format_size, format_speed};
