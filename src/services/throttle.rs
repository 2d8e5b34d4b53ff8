//! Minimum spacing between outbound upstream calls.
//!
//! Best-effort and process-local: separate relay instances do not coordinate,
//! so the spacing is only guaranteed for calls made through one `Throttle`.

use std::{sync::Mutex, time::Duration};

use tokio::time::Instant;
use tracing::debug;

#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last_dispatch: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_dispatch: Mutex::new(None),
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Records a dispatch now if the interval has elapsed, otherwise returns the time left.
    ///
    /// Nothing is recorded on `Err`, so a caller that gives up while waiting
    /// leaves no trace for later callers.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        if self.min_interval.is_zero() {
            return Ok(());
        }

        let now = Instant::now();
        let mut last = self
            .last_dispatch
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(previous) = *last {
            let ready_at = previous + self.min_interval;
            if ready_at > now {
                return Err(ready_at - now);
            }
        }
        *last = Some(now);
        Ok(())
    }

    /// Sleeps until a dispatch is allowed; returns the time spent waiting.
    ///
    /// The lock is never held across the sleep. Callers woken together race for
    /// the next dispatch and the losers sleep again.
    pub async fn wait(&self) -> Duration {
        let started = Instant::now();
        while let Err(delay) = self.try_acquire() {
            debug!(delay_ms = delay.as_millis() as u64, "Throttling upstream call");
            tokio::time::sleep(delay).await;
        }
        started.elapsed()
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::disabled()
    }
}
