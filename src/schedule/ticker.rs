use std::future::{Future, pending};
use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// A periodic trigger with a reconfigurable interval.
///
/// `start` always discards whatever tick was pending before installing the
/// new interval, so switching speeds never produces two ticks back to back.
/// A stopped ticker never fires.
pub trait Ticker {
    /// Install a fresh interval, replacing any running one
    fn start(&mut self, period: Duration);

    /// Cancel the running interval, if any
    fn stop(&mut self);

    /// Interval currently installed
    fn period(&self) -> Option<Duration>;

    fn is_running(&self) -> bool {
        self.period().is_some()
    }

    /// Resolve at the next tick. Pends forever while stopped.
    fn tick(&mut self) -> impl Future<Output = ()>;
}

/// Ticker backed by `tokio::time::Interval`
pub struct TokioTicker {
    interval: Option<Interval>,
}

impl TokioTicker {
    pub fn new() -> Self {
        Self { interval: None }
    }
}

impl Default for TokioTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl Ticker for TokioTicker {
    fn start(&mut self, period: Duration) {
        // First tick one full period from now, not immediately
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    fn stop(&mut self) {
        self.interval = None;
    }

    fn period(&self) -> Option<Duration> {
        self.interval.as_ref().map(Interval::period)
    }

    async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => pending::<()>().await,
        }
    }
}

/// Ticker driven by hand, for deterministic tests.
///
/// Records every `start`/`stop` so tests can assert on re-scheduling.
#[derive(Debug, Default)]
pub struct ManualTicker {
    period: Option<Duration>,
    queued: u32,
    /// Every interval passed to `start`, oldest first
    pub starts: Vec<Duration>,
    /// Number of `stop` calls
    pub stops: usize,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one tick. Returns false, queuing nothing, while stopped.
    pub fn fire(&mut self) -> bool {
        if self.period.is_none() {
            return false;
        }
        self.queued += 1;
        true
    }

    /// Ticks queued but not yet consumed by `tick`
    pub fn queued(&self) -> u32 {
        self.queued
    }
}

impl Ticker for ManualTicker {
    fn start(&mut self, period: Duration) {
        self.queued = 0;
        self.period = Some(period);
        self.starts.push(period);
    }

    fn stop(&mut self) {
        self.queued = 0;
        self.period = None;
        self.stops += 1;
    }

    fn period(&self) -> Option<Duration> {
        self.period
    }

    async fn tick(&mut self) {
        if self.period.is_some() && self.queued > 0 {
            self.queued -= 1;
            return;
        }
        pending::<()>().await
    }
}
