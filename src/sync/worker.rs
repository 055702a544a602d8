use anyhow::Result;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, error, info};

use crate::storage::{RunningState, TimerPersistence};

use super::event::SyncEvent;

/// Counts of what the worker did with the events it received.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Represents the background side of syncing. This module is responsible for receiving events
/// and forwarding each one to persistence. There is no retry, a failed call is lost.
pub struct SyncWorker<P> {
    receiver: UnboundedReceiver<SyncEvent>,
    persistence: P,
}

impl<P: TimerPersistence> SyncWorker<P> {
    pub fn new(receiver: UnboundedReceiver<SyncEvent>, persistence: P) -> Self {
        Self {
            receiver,
            persistence,
        }
    }

    async fn deliver(persistence: &P, event: SyncEvent) -> Result<()> {
        match event {
            SyncEvent::Created(timer) => persistence.create(timer).await,
            SyncEvent::Updated { id, title, project } => {
                persistence.update(id, title, project).await
            }
            SyncEvent::Deleted(id) => persistence.delete(id).await,
            SyncEvent::Started { id, started_at } => {
                persistence
                    .set_running(id, RunningState::Running { since: started_at })
                    .await
            }
            SyncEvent::Stopped { id, stopped_at } => {
                persistence
                    .set_running(id, RunningState::Stopped { at: stopped_at })
                    .await
            }
        }
    }

    /// Runs until every [SyncAdapter](super::SyncAdapter) is dropped.
    pub async fn run(mut self) -> SyncReport {
        let mut report = SyncReport::default();
        while let Some(event) = self.receiver.recv().await {
            debug!("Delivering event {:?}", event);
            let id = event.timer_id();
            match Self::deliver(&self.persistence, event).await {
                Ok(_) => {
                    info!("Synced timer {id}");
                    report.delivered += 1;
                }
                Err(e) => {
                    error!("Failed to sync timer {id}: {e:?}");
                    report.failed += 1;
                }
            }
        }

        self.receiver.close();
        report
    }
}
