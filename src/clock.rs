use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

/// Time source for the protocol: wall-clock reads for registration expiry and
/// suspensions for the confirmation poll. Injectable so the waiters can be
/// driven deterministically in tests.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Seconds since the unix epoch.
    fn unix_now(&self) -> u64;

    /// Suspend the calling task for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Production clock over `SystemTime` and the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn unix_now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0)
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
