use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, trace_span, Instrument};

use crate::{
    timers::{entities::Timer, store::TimerSnapshot},
    utils::clock::Clock,
};

/// How often running timers are re-rendered.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(50);

/// Signal to recompute displayed times. Carries the moment to render at and the latest
/// snapshot, it never changes store data.
#[derive(Debug, Clone)]
pub struct RefreshTick {
    pub at: DateTime<Utc>,
    pub snapshot: TimerSnapshot,
}

impl RefreshTick {
    /// Elapsed strings of every timer in the snapshot, in list order.
    pub fn render(&self) -> Vec<String> {
        self.snapshot
            .iter()
            .map(|timer| timer.render_elapsed(self.at))
            .collect()
    }
}

/// Periodic trigger for re-rendering elapsed time. Ticks are only delivered while the latest
/// snapshot has a running timer.
pub struct RefreshLoop {
    snapshots: watch::Receiver<TimerSnapshot>,
    clock: Arc<dyn Clock>,
    interval: Duration,
}

impl RefreshLoop {
    pub fn new(
        snapshots: watch::Receiver<TimerSnapshot>,
        clock: Arc<dyn Clock>,
        interval: Duration,
    ) -> Self {
        Self {
            snapshots,
            clock,
            interval,
        }
    }

    /// Spawns the recurring work on the current tokio runtime. It lives until the returned
    /// subscription is unsubscribed or dropped.
    pub fn subscribe<F>(&self, mut handler: F) -> RefreshSubscription
    where
        F: FnMut(RefreshTick) + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let snapshots = self.snapshots.clone();
        let clock = self.clock.clone();
        let interval = self.interval;

        let handle = tokio::spawn(
            async move {
                let mut tick_point = clock.instant();
                loop {
                    tick_point += interval;

                    tokio::select! {
                        biased;
                        _ = cancelled.cancelled() => return,
                        _ = clock.sleep_until(tick_point) => ()
                    }

                    if cancelled.is_cancelled() {
                        return;
                    }

                    let snapshot = snapshots.borrow().clone();
                    if snapshot.iter().any(Timer::is_running) {
                        trace!("Refresh tick");
                        handler(RefreshTick {
                            at: clock.time(),
                            snapshot,
                        });
                    }
                }
            }
            .instrument(trace_span!("Refresh loop")),
        );

        debug!("Refresh loop subscribed every {:?}", interval);
        RefreshSubscription { token, handle }
    }
}

/// Guard for a refresh subscription. Dropping it stops the loop.
pub struct RefreshSubscription {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl RefreshSubscription {
    pub fn unsubscribe(self) {
        drop(self);
    }

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for RefreshSubscription {
    fn drop(&mut self) {
        self.token.cancel();
        self.handle.abort();
        debug!("Refresh loop unsubscribed");
    }
}
