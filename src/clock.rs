use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Time source used by sessions for deadlines and delayed tasks.
///
/// The production impl sleeps on the tokio timer, so tests running under a
/// paused runtime (`#[tokio::test(start_paused = true)]`) advance virtual
/// time deterministically without a separate fake.
#[async_trait]
pub trait Clock: Send + Sync + 'static {
    /// Wall-clock time, used for informational deadlines
    fn now(&self) -> DateTime<Utc>;

    /// Delay the current task
    async fn sleep(&self, duration: Duration);
}

/// Tokio-backed clock
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
