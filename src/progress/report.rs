use crate::utils::{format_size, format_speed};

/// Snapshot sent to progress subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub filename: String,
    pub bytes_received: u64,
    /// `None` while the server has not announced a size.
    pub total_bytes: Option<u64>,
    /// 0 to 100.
    pub percent: u8,
    pub bytes_per_second: u64,
}

impl Progress {
    /// Current throughput, e.g. `"1.5 MB/s"`, once a speed was sampled.
    pub fn speed(&self) -> Option<String> {
        format_speed(self.bytes_per_second)
    }

    /// `"<received> of <total>"`.
    pub fn text(&self) -> String {
        let total = self
            .total_bytes
            .map(format_size)
            .unwrap_or_else(|| "unknown size".to_string());
        format!("{} of {}", format_size(self.bytes_received), total)
    }

    /// Progress text followed by the speed when known.
    pub fn label(&self) -> String {
        match self.speed() {
            Some(speed) => format!("{} at {}", self.text(), speed),
            None => self.text(),
        }
    }

    /// `"<percent>% of <filename> Completed"`.
    pub fn title(&self) -> String {
        format!("{}% of {} Completed", self.percent, self.filename)
    }
}
