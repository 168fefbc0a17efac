//! Token bucket pacing for outgoing requests.
//!
//! Used by the redownloader so a long batch of download requests reaches the
//! remote service at a steady rate instead of as a burst.

use tokio::time::{sleep, Duration, Instant};
use tracing::debug;

/// Token bucket rate limiter.
///
/// Tokens are added at a constant rate and consumed when requests are made.
/// If no tokens are available, the request must wait.
#[derive(Debug)]
pub struct TokenBucket {
    /// Max tokens held at once.
    capacity: f32,
    /// Current available tokens.
    tokens: f32,
    /// Tokens added per second.
    refill_rate: f32,
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a bucket allowing `requests_per_minute`, holding at most
    /// `burst` tokens.
    ///
    /// The bucket starts full. A zero rate or burst is treated as one.
    pub fn new(requests_per_minute: u32, burst: u32) -> Self {
        let capacity = burst.max(1) as f32;
        Self {
            capacity,
            tokens: capacity,
            refill_rate: requests_per_minute.max(1) as f32 / 60.0,
            last_refill: Instant::now(),
        }
    }

    /// Steady pacing: one request at a time, spaced evenly.
    pub fn per_minute(requests_per_minute: u32) -> Self {
        Self::new(requests_per_minute, 1)
    }

    /// Time between two tokens once the bucket is drained.
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.refill_rate)
    }

    /// Try to acquire a token.
    ///
    /// Returns `Err(wait_duration)` if rate limited, with the duration to wait.
    pub fn try_acquire(&mut self) -> Result<(), Duration> {
        self.refill();

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            let tokens_needed = 1.0 - self.tokens;
            let wait_secs = tokens_needed / self.refill_rate;
            Err(Duration::from_secs_f32(wait_secs))
        }
    }

    /// Wait until a token is available, then take it.
    pub async fn acquire(&mut self) {
        while let Err(wait) = self.try_acquire() {
            debug!("Rate limited, waiting {:?}", wait);
            sleep(wait).await;
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f32();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.capacity);
        self.last_refill = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_bucket_new() {
        let bucket = TokenBucket::new(120, 3);
        assert_eq!(bucket.capacity, 3.0);
        assert_eq!(bucket.tokens, 3.0);
        assert!((bucket.refill_rate - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_per_minute_interval() {
        let bucket = TokenBucket::per_minute(120);
        assert_eq!(bucket.capacity, 1.0);
        assert_eq!(bucket.interval().as_millis(), 500);
    }

    #[test]
    fn test_zero_rate_is_clamped() {
        let bucket = TokenBucket::new(0, 0);
        assert_eq!(bucket.capacity, 1.0);
        assert!(bucket.refill_rate > 0.0);
    }

    #[test]
    fn test_burst_then_rate_limited() {
        let mut bucket = TokenBucket::new(60, 2);

        assert!(bucket.try_acquire().is_ok());
        assert!(bucket.try_acquire().is_ok());

        let wait = bucket.try_acquire().unwrap_err();
        // At 60 rpm one token takes a second
        assert!(wait.as_millis() > 0);
        assert!(wait.as_secs_f32() <= 1.0);
    }

    #[tokio::test]
    async fn test_acquire_waits_for_refill() {
        // 600 rpm: one token every 100ms
        let mut bucket = TokenBucket::per_minute(600);

        let start = Instant::now();
        bucket.acquire().await;
        bucket.acquire().await;
        bucket.acquire().await;
        let elapsed = start.elapsed();

        // First token is immediate, the next two wait ~100ms each
        assert!(elapsed >= Duration::from_millis(180));
        assert!(elapsed < Duration::from_secs(2));
    }
}
