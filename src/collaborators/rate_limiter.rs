// Request spacing for outbound API calls.
//
// A recommendation fans out into one video search per ranked subtopic, all
// issued concurrently. The YouTube Data API meters per-second bursts, so the
// search client spaces its calls through this limiter: each caller waits until
// at least `interval` has passed since the previous call was let through.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<Slot>>,
}

struct Slot {
    interval: Duration,
    /// Earliest instant the next call may go out
    next_free: Option<Instant>,
}

impl RateLimiter {
    /// Allow at most `requests_per_second` calls per second.
    pub fn new(requests_per_second: f64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Slot {
                interval: Duration::from_secs_f64(1.0 / requests_per_second.max(f64::EPSILON)),
                next_free: None,
            })),
        }
    }

    /// Wait for this caller's turn.
    ///
    /// The slot is reserved under the lock and the sleep happens after it is
    /// released, so concurrent callers queue up at successive intervals.
    pub async fn acquire(&self) {
        let wait_until = {
            let mut slot = self.inner.lock().await;
            let now = Instant::now();
            let start = match slot.next_free {
                Some(t) if t > now => t,
                _ => now,
            };
            slot.next_free = Some(start + slot.interval);
            start
        };

        tokio::time::sleep_until(wait_until).await;
    }
}
