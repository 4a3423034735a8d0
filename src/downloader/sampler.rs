//! Throughput sampling.
//!
//! A ticking task reads the cumulative byte counter once per period and turns the
//! delta into a bytes-per-second figure. The first tick only records a baseline,
//! so a transfer never reports a spike made of everything received before the
//! sampler started.

use crate::download::TransferState;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Records one sample into `state`.
///
/// Speed is only updated when a previous sample exists; the baseline moves on
/// every call.
pub fn record_sample(state: &mut TransferState, period: Duration) {
    let current = state.bytes_received;
    if let Some(last) = state.last_sample_bytes {
        let delta = current.saturating_sub(last);
        let millis = period.as_millis().max(1);
        state.bytes_per_second = (u128::from(delta) * 1000 / millis) as u64;
    }
    state.last_sample_bytes = Some(current);
}

/// Periodic task driving [`record_sample`].
#[derive(Debug, Clone, Copy)]
pub struct SpeedSampler {
    period: Duration,
}

impl SpeedSampler {
    pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Spawns the ticking task.
    ///
    /// `tick` receives the period and returns `false` to stop sampling. The task
    /// also ends when `stop` is cancelled.
    pub fn spawn<F>(self, stop: CancellationToken, mut tick: F) -> JoinHandle<()>
    where
        F: FnMut(Duration) -> bool + Send + 'static,
    {
        let period = self.period;
        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = stop.cancelled() => break,
                    _ = ticker.tick() => {
                        if !tick(period) {
                            break;
                        }
                    }
                }
            }
        })
    }
}

impl Default for SpeedSampler {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PERIOD)
    }
}
