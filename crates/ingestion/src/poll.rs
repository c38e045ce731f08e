//! Fixed-interval polling policy shared by the gate and the tracker.

use std::time::Duration;

use examgen_core::config::IngestionConfig;

/// How often to re-query job state, and how many polls to allow before a
/// wait is reported as timed out instead of looping forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_polls: u32,
}

impl PollPolicy {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);
    pub const DEFAULT_MAX_POLLS: u32 = 180;

    pub fn new(interval: Duration, max_polls: u32) -> Self {
        Self {
            interval,
            max_polls,
        }
    }

    pub fn from_config(config: &IngestionConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.poll_interval_secs),
            max_polls: config.max_polls,
        }
    }

    /// Suspend the caller for one poll interval.
    pub(crate) async fn pause(&self) {
        tokio::time::sleep(self.interval).await;
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            max_polls: Self::DEFAULT_MAX_POLLS,
        }
    }
}
