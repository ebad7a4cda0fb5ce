use std::time::Duration;

/// Bounds for a polling loop: backoff doubles from `initial_interval` up to
/// `max_interval`, and the whole wait is capped by `wait_budget`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingPolicy {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub wait_budget: Duration,
}

impl PollingPolicy {
    pub const fn new(
        initial_interval: Duration,
        max_interval: Duration,
        wait_budget: Duration,
    ) -> Self {
        Self {
            initial_interval,
            max_interval,
            wait_budget,
        }
    }

    pub fn transcription_default() -> Self {
        Self::new(
            Duration::from_secs(2),
            Duration::from_secs(30),
            Duration::from_secs(300),
        )
    }

    pub fn video_default() -> Self {
        Self::new(
            Duration::from_secs(3),
            Duration::from_secs(30),
            Duration::from_secs(600),
        )
    }

    pub fn next_interval(&self, current: Duration) -> Duration {
        (current * 2).min(self.max_interval)
    }
}
