//! Sync event notifications.
//!
//! Presentation layers subscribe to a driver's [`EventFeed`] to learn about
//! state changes and finished cycles without polling.

use crate::state::{SyncReport, SyncState};
use parking_lot::RwLock;
use std::sync::mpsc::{self, Receiver, Sender};

/// Something observable happened on a sync driver.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// The driver entered a new state.
    StateChanged(SyncState),
    /// A cycle finished and its token was committed.
    CycleCompleted(SyncReport),
    /// A cycle failed; the message is the error's display form.
    CycleFailed(String),
    /// A remote create failed before any cycle ran.
    CreateFailed(String),
    /// The store was reset and the reset persisted.
    StoreReset,
}

/// Fan-out of [`SyncEvent`]s to any number of subscribers.
#[derive(Debug, Default)]
pub struct EventFeed {
    subscribers: RwLock<Vec<Sender<SyncEvent>>>,
}

impl EventFeed {
    /// Creates a feed with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to all future events.
    ///
    /// The receiver should be drained regularly; events queue up unbounded.
    pub fn subscribe(&self) -> Receiver<SyncEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.write().push(tx);
        rx
    }

    /// Sends `event` to every live subscriber and forgets dropped ones.
    pub fn emit(&self, event: SyncEvent) {
        let mut subscribers = self.subscribers.write();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_and_receive() {
        let feed = EventFeed::new();
        let rx = feed.subscribe();

        feed.emit(SyncEvent::StateChanged(SyncState::Fetching));
        feed.emit(SyncEvent::StoreReset);

        assert!(matches!(
            rx.try_recv().unwrap(),
            SyncEvent::StateChanged(SyncState::Fetching)
        ));
        assert!(matches!(rx.try_recv().unwrap(), SyncEvent::StoreReset));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn subscriber_cleanup() {
        let feed = EventFeed::new();
        let rx1 = feed.subscribe();
        let rx2 = feed.subscribe();
        assert_eq!(feed.subscriber_count(), 2);

        drop(rx1);
        feed.emit(SyncEvent::CycleFailed("boom".into()));
        assert_eq!(feed.subscriber_count(), 1);

        match rx2.try_recv().unwrap() {
            SyncEvent::CycleFailed(message) => assert_eq!(message, "boom"),
            other => panic!("unexpected event {:?}", other),
        }
    }
}
