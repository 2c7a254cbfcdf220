use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};

/// Owns the background tasks of one game: a recurring countdown and a single
/// delayed one-shot. Scheduling either replaces the previous task of the same
/// kind; dropping the service aborts both.
pub struct TimerService {
    tick_interval: Duration,
    countdown: Option<JoinHandle<()>>,
    delayed: Option<JoinHandle<()>>,
}

impl TimerService {
    pub fn new(tick_interval: Duration) -> Self {
        Self {
            tick_interval,
            countdown: None,
            delayed: None,
        }
    }

    /// Runs `on_tick` every interval, first firing one interval from now. The
    /// countdown stops when `on_tick` resolves to `false`.
    pub fn start_countdown<F, Fut>(&mut self, mut on_tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.cancel_countdown();

        let period = self.tick_interval;
        self.countdown = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !on_tick().await {
                    break;
                }
            }
        }));
    }

    /// Runs `task` once after `delay`, superseding any pending one-shot.
    pub fn schedule_once<Fut>(&mut self, delay: Duration, task: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel_delayed();

        self.delayed = Some(tokio::spawn(async move {
            sleep(delay).await;
            task.await;
        }));
    }

    pub fn cancel_countdown(&mut self) {
        if let Some(handle) = self.countdown.take() {
            handle.abort();
        }
    }

    pub fn cancel_delayed(&mut self) {
        if let Some(handle) = self.delayed.take() {
            handle.abort();
        }
    }

    pub fn cancel_all(&mut self) {
        self.cancel_countdown();
        self.cancel_delayed();
    }

    pub fn has_countdown(&self) -> bool {
        self.countdown.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn has_pending(&self) -> bool {
        self.delayed.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for TimerService {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
