//! Fixed-interval tick scheduler.
//!
//! Runs a synchronous callback on a tokio interval until stopped. The callback
//! receives milliseconds since the scheduler started. Ticks never overlap and
//! a tick that has begun always runs to completion: shutdown is only observed
//! between ticks.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Handle to a running tick loop.
#[derive(Debug)]
pub struct TickScheduler {
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<u64>>,
}

impl TickScheduler {
    /// Spawn the tick loop on the current runtime.
    ///
    /// The first tick fires one full `period` after spawning. Late ticks are
    /// skipped rather than bunched up.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero or if called outside a tokio runtime.
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(u64) + Send + 'static,
    {
        let (shutdown, mut shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let start = Instant::now();
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first interval tick completes immediately.
            ticker.tick().await;

            info!(period_ms = period.as_millis() as u64, "Tick loop started");
            let mut ticks: u64 = 0;
            loop {
                tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        ticks += 1;
                        on_tick(start.elapsed().as_millis() as u64);
                    }
                }
            }
            info!(ticks, "Tick loop stopped");
            ticks
        });

        Self {
            shutdown: Some(shutdown),
            handle: Some(handle),
        }
    }

    /// Returns true until [`stop`](Self::stop) has been called.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Signal the loop and wait for it to exit.
    ///
    /// Returns the number of ticks that ran. Calling this twice is harmless;
    /// the second call returns zero.
    pub async fn stop(&mut self) -> u64 {
        if let Some(shutdown) = self.shutdown.take() {
            // The loop may already be gone if the runtime is shutting down.
            let _ = shutdown.send(());
        }
        let Some(handle) = self.handle.take() else {
            return 0;
        };
        match handle.await {
            Ok(ticks) => ticks,
            Err(e) => {
                warn!("Tick loop ended abnormally: {}", e);
                0
            }
        }
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!("Tick scheduler dropped without stop, aborting loop");
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<u64>>>, impl FnMut(u64) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |now| sink.lock().unwrap().push(now))
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_fire_on_schedule() {
        let (seen, on_tick) = recorder();
        let mut scheduler = TickScheduler::spawn(Duration::from_millis(400), on_tick);

        tokio::time::sleep(Duration::from_millis(1_250)).await;
        let ticks = scheduler.stop().await;

        assert_eq!(ticks, 3);
        assert_eq!(*seen.lock().unwrap(), vec![400, 800, 1_200]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_tick_after_stop() {
        let (seen, on_tick) = recorder();
        let mut scheduler = TickScheduler::spawn(Duration::from_millis(100), on_tick);

        tokio::time::sleep(Duration::from_millis(350)).await;
        scheduler.stop().await;
        let count = seen.lock().unwrap().len();

        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert_eq!(seen.lock().unwrap().len(), count);
        assert!(!scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_twice_is_harmless() {
        let (_seen, on_tick) = recorder();
        let mut scheduler = TickScheduler::spawn(Duration::from_millis(100), on_tick);
        scheduler.stop().await;
        assert_eq!(scheduler.stop().await, 0);
    }
}
