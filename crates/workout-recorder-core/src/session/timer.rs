use std::time::Duration;

use async_trait::async_trait;
use tokio::{
    sync::mpsc,
    time::{Instant, Interval, MissedTickBehavior},
};
use tracing::trace;

/// Default period of the elapsed-time counter.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Timer service driving the elapsed-time counter.
///
/// The controller only polls [`tick`](Self::tick) while the session is
/// recording, and calls [`restart`](Self::restart) each time recording
/// (re)starts so a partially elapsed period from before a pause never
/// produces an increment.
#[async_trait]
pub trait TickSource: Send {
    /// Starts a fresh period and discards anything pending.
    fn restart(&mut self);

    /// Waits for the next period to elapse.
    async fn tick(&mut self);
}

/// Wall-clock ticks backed by [`tokio::time::Interval`].
///
/// Must be created inside a Tokio runtime.
pub struct IntervalTicks {
    interval: Interval,
}

impl IntervalTicks {
    /// Creates a ticker with the given period (clamped to at least 1ms).
    pub fn new(period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        // First tick one full period out, unlike `tokio::time::interval`.
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

#[async_trait]
impl TickSource for IntervalTicks {
    fn restart(&mut self) {
        self.interval.reset();
    }

    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// Simulated ticks injected through a [`TickInjector`].
///
/// Lets tests and hosts with their own clock advance the counter
/// deterministically instead of waiting on the wall clock.
pub struct ManualTicks {
    rx: mpsc::UnboundedReceiver<()>,
}

/// Sending half of [`ManualTicks`].
#[derive(Debug, Clone)]
pub struct TickInjector {
    tx: mpsc::UnboundedSender<()>,
}

/// Creates a connected simulated ticker and its injector.
pub fn manual_ticks() -> (ManualTicks, TickInjector) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ManualTicks { rx }, TickInjector { tx })
}

impl TickInjector {
    /// Queues one tick. Returns false once the ticker has been dropped.
    pub fn tick(&self) -> bool {
        self.tx.send(()).is_ok()
    }

    /// Queues `count` ticks.
    pub fn advance(&self, count: u32) {
        for _ in 0..count {
            if !self.tick() {
                break;
            }
        }
    }
}

#[async_trait]
impl TickSource for ManualTicks {
    fn restart(&mut self) {
        let mut dropped = 0u32;
        while self.rx.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            trace!(dropped, "Discarded pending ticks");
        }
    }

    async fn tick(&mut self) {
        if self.rx.recv().await.is_none() {
            // Injector gone: no further ticks will ever arrive.
            std::future::pending::<()>().await;
        }
    }
}
