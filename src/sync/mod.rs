//! One-way, optimistic mirroring of store mutations.
//!
//! [SyncAdapter] is what the store holds. It puts every mutation on a channel and returns
//! immediately, [worker::SyncWorker] drains the channel into a
//! [TimerPersistence](crate::storage::TimerPersistence). Nothing flows back: a failed call is
//! logged and lost, local state is never rolled back.

pub mod event;
pub mod worker;

use event::SyncEvent;
use tokio::sync::mpsc;
use tracing::{trace, warn};
use worker::SyncWorker;

use crate::storage::TimerPersistence;

/// What happened to an event handed to [SyncAdapter::sync]. This is only about hand-off, delivery
/// is reported by the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Queued,
    /// The worker is gone, the event was dropped.
    Disconnected,
}

#[derive(Clone)]
pub struct SyncAdapter {
    sender: mpsc::UnboundedSender<SyncEvent>,
}

impl SyncAdapter {
    pub fn new(sender: mpsc::UnboundedSender<SyncEvent>) -> Self {
        Self { sender }
    }

    /// Fire-and-forget. Never blocks and never fails the caller.
    pub fn sync(&self, event: SyncEvent) -> SyncOutcome {
        trace!("Queueing sync event {:?}", event);
        match self.sender.send(event) {
            Ok(()) => SyncOutcome::Queued,
            Err(mpsc::error::SendError(event)) => {
                warn!("Sync worker is gone, dropping {:?}", event);
                SyncOutcome::Disconnected
            }
        }
    }
}

/// Creates a connected adapter and worker. The worker finishes once every clone of the adapter
/// is dropped.
pub fn channel<P: TimerPersistence>(persistence: P) -> (SyncAdapter, SyncWorker<P>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (SyncAdapter::new(sender), SyncWorker::new(receiver, persistence))
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::{event::SyncEvent, SyncAdapter, SyncOutcome};
    use crate::timers::entities::TimerId;

    #[test]
    fn queued_while_receiver_is_alive() {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let adapter = SyncAdapter::new(sender);
        let id = TimerId::new_v4();

        assert_eq!(adapter.sync(SyncEvent::Deleted(id)), SyncOutcome::Queued);
        assert_eq!(receiver.try_recv().ok(), Some(SyncEvent::Deleted(id)));
    }

    #[test]
    fn disconnected_after_receiver_is_dropped() {
        let (sender, receiver) = mpsc::unbounded_channel();
        let adapter = SyncAdapter::new(sender);
        drop(receiver);

        assert_eq!(
            adapter.sync(SyncEvent::Deleted(TimerId::new_v4())),
            SyncOutcome::Disconnected
        );
    }
}
