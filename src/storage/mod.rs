//! Persistence of timers is organized through [TimerPersistence].
//! The store never waits on it: the sync worker calls it in the background and local state stays
//! authoritative for the session. [file_store::JsonFileStore] is the implementation used by the
//! cli.

pub mod file_store;

use std::ops::Deref;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::timers::entities::{Timer, TimerId};

/// New running state of a timer, as sent to persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunningState {
    Running { since: DateTime<Utc> },
    /// The timer was stopped at `at`. Persistence folds `at - running_since` into `elapsed`.
    Stopped { at: DateTime<Utc> },
}

/// Interface for abstracting storage of timers. Every operation is keyed by the same
/// [TimerId] the store uses. Unknown ids are expected to be ignored.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TimerPersistence: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Timer>>;

    async fn create(&self, timer: Timer) -> Result<()>;

    async fn update(&self, id: TimerId, title: String, project: String) -> Result<()>;

    async fn delete(&self, id: TimerId) -> Result<()>;

    async fn set_running(&self, id: TimerId, state: RunningState) -> Result<()>;
}

#[async_trait]
impl<T> TimerPersistence for T
where
    T: Deref + Send + Sync,
    T::Target: TimerPersistence,
{
    async fn list_all(&self) -> Result<Vec<Timer>> {
        self.deref().list_all().await
    }

    async fn create(&self, timer: Timer) -> Result<()> {
        self.deref().create(timer).await
    }

    async fn update(&self, id: TimerId, title: String, project: String) -> Result<()> {
        self.deref().update(id, title, project).await
    }

    async fn delete(&self, id: TimerId) -> Result<()> {
        self.deref().delete(id).await
    }

    async fn set_running(&self, id: TimerId, state: RunningState) -> Result<()> {
        self.deref().set_running(id, state).await
    }
}
