use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::debug;

/// Enforces a pause after successful data-source calls.
///
/// Failed calls skip the pause, so fast-fail paths add no latency.
#[derive(Debug)]
pub struct RequestPacer {
    delay: Duration,
    pauses: AtomicU64,
}

impl RequestPacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pauses: AtomicU64::new(0),
        }
    }

    /// Sleeps for the configured delay.
    pub async fn pause(&self) {
        // Relaxed: a statistics counter with no ordering dependency.
        self.pauses.fetch_add(1, Ordering::Relaxed);
        if self.delay.is_zero() {
            return;
        }
        debug!(delay_ms = self.delay.as_millis() as u64, "Pacing data-source requests");
        tokio::time::sleep(self.delay).await;
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Number of pauses taken so far.
    pub fn pauses(&self) -> u64 {
        self.pauses.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_pause_waits_for_delay() {
        let pacer = RequestPacer::new(Duration::from_millis(1500));
        let start = tokio::time::Instant::now();
        pacer.pause().await;
        assert!(start.elapsed() >= Duration::from_millis(1500));
        assert_eq!(pacer.pauses(), 1);
    }

    #[tokio::test]
    async fn test_zero_delay_counts_without_sleeping() {
        let pacer = RequestPacer::new(Duration::ZERO);
        pacer.pause().await;
        pacer.pause().await;
        assert_eq!(pacer.pauses(), 2);
        assert_eq!(pacer.delay(), Duration::ZERO);
    }
}
