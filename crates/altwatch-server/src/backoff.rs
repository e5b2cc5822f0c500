//! Exponential backoff with jitter for loops polling external services.
//!
//! Uses the tokio clock so paused-time tests can step through retries.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    current: Duration,
    next_attempt_at: Instant,
    jitter_ratio: f64,
    failures: u32,
}

impl Backoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        let base = base.max(Duration::from_millis(1));
        Self {
            base,
            max: max.max(base),
            current: base,
            next_attempt_at: Instant::now(),
            jitter_ratio: 0.2,
            failures: 0,
        }
    }

    pub fn ready(&self) -> bool {
        Instant::now() >= self.next_attempt_at
    }

    /// Consecutive failures since the last success.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn reset(&mut self) {
        self.current = self.base;
        self.failures = 0;
        self.next_attempt_at = Instant::now();
    }

    /// Record a failure and return the delay before the next attempt.
    pub fn fail(&mut self) -> Duration {
        self.failures = self.failures.saturating_add(1);
        self.current = self.current.saturating_mul(2).min(self.max);
        let delay = with_jitter(self.current, self.jitter_ratio);
        self.next_attempt_at = Instant::now() + delay;
        delay
    }
}

fn with_jitter(delay: Duration, ratio: f64) -> Duration {
    let delay_ms = delay.as_millis();
    let jitter_ms_max = ((delay_ms as f64) * ratio.clamp(0.0, 1.0)) as u128;
    if jitter_ms_max == 0 {
        return delay;
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u128)
        .unwrap_or(0);
    delay + Duration::from_millis((nanos % (jitter_ms_max + 1)) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn failure_defers_next_attempt() {
        let mut backoff = Backoff::new(Duration::from_secs(1), Duration::from_secs(60));
        assert!(backoff.ready());

        let delay = backoff.fail();
        assert!(delay >= Duration::from_secs(2));
        assert!(delay <= Duration::from_millis(2400));
        assert!(!backoff.ready());

        tokio::time::advance(delay).await;
        assert!(backoff.ready());
    }

    #[tokio::test(start_paused = true)]
    async fn delay_saturates_at_max() {
        let mut backoff = Backoff::new(Duration::from_secs(10), Duration::from_secs(30));
        for _ in 0..5 {
            backoff.fail();
        }
        let delay = backoff.fail();
        assert!(delay >= Duration::from_secs(30));
        assert!(delay <= Duration::from_secs(36));
        assert_eq!(backoff.failures(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_clears_failures() {
        let mut backoff = Backoff::new(Duration::from_millis(100), Duration::from_secs(1));
        backoff.fail();
        backoff.reset();
        assert!(backoff.ready());
        assert_eq!(backoff.failures(), 0);
    }
}
