//! Periodic refresh task
//!
//! Ticks immediately, then every `period`. Dropping the poller aborts the
//! task, so no fetch outlives the view that started it.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

pub struct Poller {
    handle: JoinHandle<()>,
    period: Duration,
}

impl Poller {
    pub fn start<F, Fut>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // A slow fetch delays the schedule instead of bursting to catch up
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                tick().await;
            }
        });
        debug!(period_secs = period.as_secs(), "Poller started");
        Self { handle, period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Explicit teardown, same as dropping
    pub fn stop(self) {}
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
        debug!("Poller stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_poller(period: Duration) -> (Poller, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let ticks = Arc::clone(&count);
        let poller = Poller::start(period, move || {
            let ticks = Arc::clone(&ticks);
            async move {
                ticks.fetch_add(1, Ordering::SeqCst);
            }
        });
        (poller, count)
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_immediately_then_every_period() {
        let (poller, count) = counting_poller(Duration::from_secs(300));

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(count.load(Ordering::SeqCst), 4);
        assert!(poller.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_future_ticks() {
        let (poller, count) = counting_poller(Duration::from_secs(300));
        tokio::time::sleep(Duration::from_millis(1)).await;
        poller.stop();

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
