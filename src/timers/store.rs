use std::{collections::HashSet, sync::Arc};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, instrument};

use crate::{
    sync::{event::SyncEvent, SyncAdapter},
    utils::clock::Clock,
};

use super::entities::{Timer, TimerId};

/// Immutable view of the timer collection. Every mutation produces a new one.
pub type TimerSnapshot = Arc<[Timer]>;

/// The authoritative collection of timers for a session.
///
/// Mutations are synchronous and take `&mut self`, so they never interleave. Each one replaces
/// the snapshot instead of touching a [Timer] in place, publishes it to subscribers and, when
/// it changed something, hands a [SyncEvent] to the [SyncAdapter]. Targets that no longer exist
/// are ignored and reported as `false`.
pub struct TimerStore {
    timers: TimerSnapshot,
    clock: Arc<dyn Clock>,
    sync: Option<SyncAdapter>,
    published: watch::Sender<TimerSnapshot>,
}

impl TimerStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::from_timers(Vec::new(), clock)
    }

    /// Seeds the store, usually with what persistence returned from `list_all`. Seeding is not
    /// forwarded to sync.
    pub fn from_timers(timers: Vec<Timer>, clock: Arc<dyn Clock>) -> Self {
        debug_assert!(
            {
                let mut seen = HashSet::new();
                timers.iter().all(|timer| seen.insert(timer.id))
            },
            "Timer ids must be unique"
        );
        let timers: TimerSnapshot = timers.into();
        let (published, _) = watch::channel(timers.clone());
        Self {
            timers,
            clock,
            sync: None,
            published,
        }
    }

    pub fn with_sync(self, sync: SyncAdapter) -> Self {
        Self {
            sync: Some(sync),
            ..self
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.timers.clone()
    }

    /// Receives every snapshot the store produces from now on.
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.published.subscribe()
    }

    pub fn get(&self, id: TimerId) -> Option<&Timer> {
        self.timers.iter().find(|timer| timer.id == id)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.time()
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    /// Appends a stopped timer with a fresh id.
    #[instrument(level = "debug", skip(self))]
    pub fn create(&mut self, title: String, project: String) -> Timer {
        let timer = Timer::new(self.fresh_id(), title, project);
        let timers = self
            .timers
            .iter()
            .cloned()
            .chain(std::iter::once(timer.clone()))
            .collect();
        self.replace(timers);
        debug!("Created timer {}", timer.id);
        self.forward(SyncEvent::Created(timer.clone()));
        timer
    }

    /// Replaces title and project only. Elapsed time and running state are left alone.
    pub fn edit(&mut self, id: TimerId, title: String, project: String) -> bool {
        let edited = self.replace_timer(id, |timer| {
            Some(timer.clone().with_details(title.clone(), project.clone()))
        });
        if edited.is_some() {
            debug!("Edited timer {id}");
            self.forward(SyncEvent::Updated { id, title, project });
        }
        edited.is_some()
    }

    pub fn delete(&mut self, id: TimerId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        let timers = self
            .timers
            .iter()
            .filter(|timer| timer.id != id)
            .cloned()
            .collect();
        self.replace(timers);
        debug!("Deleted timer {id}");
        self.forward(SyncEvent::Deleted(id));
        true
    }

    /// Starts a stopped timer. Starting a running one changes nothing, so its current run is
    /// kept.
    pub fn start(&mut self, id: TimerId) -> bool {
        let now = self.clock.time();
        let started = self.replace_timer(id, |timer| {
            (!timer.is_running()).then(|| timer.clone().started_at(now))
        });
        if started.is_some() {
            debug!("Started timer {id} at {now}");
            self.forward(SyncEvent::Started {
                id,
                started_at: now,
            });
        }
        started.is_some()
    }

    /// Stops a running timer, folding the current run into its elapsed time.
    pub fn stop(&mut self, id: TimerId) -> bool {
        let now = self.clock.time();
        let stopped = self.replace_timer(id, |timer| {
            timer.is_running().then(|| timer.clone().stopped_at(now))
        });
        if let Some(timer) = &stopped {
            debug!("Stopped timer {id} at {now}, elapsed {}ms", timer.elapsed);
            self.forward(SyncEvent::Stopped {
                id,
                stopped_at: now,
            });
        }
        stopped.is_some()
    }

    fn fresh_id(&self) -> TimerId {
        loop {
            let id = TimerId::new_v4();
            if self.get(id).is_none() {
                return id;
            }
        }
    }

    /// Swaps the entry with `id` for whatever `update` returns. `None` from `update` means there
    /// is nothing to change.
    fn replace_timer(
        &mut self,
        id: TimerId,
        update: impl FnOnce(&Timer) -> Option<Timer>,
    ) -> Option<Timer> {
        let index = self.timers.iter().position(|timer| timer.id == id)?;
        let updated = update(&self.timers[index])?;
        debug_assert_eq!(updated.id, id, "Timer id is immutable");
        let mut timers = self.timers.to_vec();
        timers[index] = updated.clone();
        self.replace(timers);
        Some(updated)
    }

    fn replace(&mut self, timers: Vec<Timer>) {
        self.timers = timers.into();
        self.published.send_replace(self.timers.clone());
    }

    fn forward(&self, event: SyncEvent) {
        if let Some(sync) = &self.sync {
            sync.sync(event);
        }
    }
}
