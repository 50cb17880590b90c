use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

use crate::utils::time::{Clock, elapsed_since};

/// Recurring "time since punch-in" publisher.
///
/// Owns at most one interval task. The task is aborted on `stop`, on
/// `restart`, and when the ticker is dropped, so it never outlives its owner.
pub struct ElapsedTicker {
    tx: Arc<watch::Sender<Duration>>,
    rx: watch::Receiver<Duration>,
    task: Option<JoinHandle<()>>,
    period: StdDuration,
    clock: Arc<dyn Clock>,
}

impl ElapsedTicker {
    pub fn new(period: StdDuration, clock: Arc<dyn Clock>) -> Self {
        let (tx, rx) = watch::channel(Duration::zero());
        Self {
            tx: Arc::new(tx),
            rx,
            task: None,
            period,
            clock,
        }
    }

    /// Starts ticking from `since`, replacing any running task.
    /// Must be called from inside a tokio runtime.
    pub fn start(&mut self, since: DateTime<Utc>) {
        self.abort_task();

        let tx = Arc::clone(&self.tx);
        let clock = Arc::clone(&self.clock);
        let period = self.period;

        tx.send_replace(elapsed_since(since, clock.now()));
        debug!(%since, ?period, "elapsed ticker started");

        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                let elapsed = elapsed_since(since, clock.now());
                trace!(seconds = elapsed.num_seconds(), "tick");
                tx.send_replace(elapsed);
            }
        }));
    }

    /// Goes idle and reports zero.
    pub fn stop(&mut self) {
        if self.abort_task() {
            debug!("elapsed ticker stopped");
        }
        self.tx.send_replace(Duration::zero());
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn elapsed(&self) -> Duration {
        *self.rx.borrow()
    }

    /// Receiver that wakes on every tick.
    pub fn subscribe(&self) -> watch::Receiver<Duration> {
        self.tx.subscribe()
    }

    fn abort_task(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }
}

impl Drop for ElapsedTicker {
    fn drop(&mut self) {
        self.abort_task();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::ManualClock;
    use chrono::TimeZone;

    fn clock_at_nine() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap()))
    }

    #[tokio::test(start_paused = true)]
    async fn idle_ticker_reports_zero() {
        let ticker = ElapsedTicker::new(StdDuration::from_secs(1), clock_at_nine());
        assert!(!ticker.is_running());
        assert_eq!(ticker.elapsed(), Duration::zero());
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_on_every_interval() {
        let clock = clock_at_nine();
        let since = clock.now() - Duration::minutes(10);
        let mut ticker = ElapsedTicker::new(StdDuration::from_secs(1), clock.clone());
        let mut rx = ticker.subscribe();

        ticker.start(since);
        assert_eq!(ticker.elapsed(), Duration::minutes(10));
        rx.borrow_and_update();

        clock.advance(Duration::seconds(1));
        tokio::time::sleep(StdDuration::from_millis(1001)).await;
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), Duration::minutes(10) + Duration::seconds(1));
        assert!(ticker.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_aborts_and_resets() {
        let clock = clock_at_nine();
        let mut ticker = ElapsedTicker::new(StdDuration::from_secs(1), clock.clone());
        ticker.start(clock.now() - Duration::hours(1));
        assert!(ticker.is_running());

        ticker.stop();
        tokio::task::yield_now().await;
        assert!(!ticker.is_running());
        assert_eq!(ticker.elapsed(), Duration::zero());

        // no further ticks land after stop
        clock.advance(Duration::seconds(5));
        tokio::time::sleep(StdDuration::from_secs(5)).await;
        assert_eq!(ticker.elapsed(), Duration::zero());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_previous_task() {
        let clock = clock_at_nine();
        let mut ticker = ElapsedTicker::new(StdDuration::from_secs(1), clock.clone());
        ticker.start(clock.now() - Duration::hours(2));
        ticker.start(clock.now() - Duration::minutes(3));
        assert_eq!(ticker.elapsed(), Duration::minutes(3));

        clock.advance(Duration::seconds(2));
        tokio::time::sleep(StdDuration::from_millis(2001)).await;
        assert_eq!(ticker.elapsed(), Duration::minutes(3) + Duration::seconds(2));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_ticker_closes_the_channel() {
        let clock = clock_at_nine();
        let mut ticker = ElapsedTicker::new(StdDuration::from_secs(1), clock.clone());
        let mut rx = ticker.subscribe();
        ticker.start(clock.now());
        rx.borrow_and_update();
        drop(ticker);

        tokio::time::sleep(StdDuration::from_secs(3)).await;
        // only sender was held by the ticker and its task; both are gone
        assert!(rx.changed().await.is_err());
    }
}
