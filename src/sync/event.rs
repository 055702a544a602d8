use chrono::{DateTime, Utc};

use crate::timers::entities::{Timer, TimerId};

/// A local mutation that has to be mirrored to persistence. Start and stop carry the timestamp
/// the store used, so both sides compute the same elapsed time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    Created(Timer),
    Updated {
        id: TimerId,
        title: String,
        project: String,
    },
    Deleted(TimerId),
    Started {
        id: TimerId,
        started_at: DateTime<Utc>,
    },
    Stopped {
        id: TimerId,
        stopped_at: DateTime<Utc>,
    },
}

impl SyncEvent {
    pub fn timer_id(&self) -> TimerId {
        match self {
            SyncEvent::Created(timer) => timer.id,
            SyncEvent::Updated { id, .. }
            | SyncEvent::Deleted(id)
            | SyncEvent::Started { id, .. }
            | SyncEvent::Stopped { id, .. } => *id,
        }
    }
}
