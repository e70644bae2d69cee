//! Favorites change notification
//!
//! Broadcast stream of ticks (no payload) emitted after every favorite
//! add/remove and after a cascading delete of a favorite document. Consumers
//! re-query current state; there are no deltas and no replay for late
//! subscribers.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;

/// Fan-out tick broadcaster for favorites changes.
#[derive(Debug, Default)]
pub struct FavoritesWatch {
    subscribers: Mutex<Vec<Sender<()>>>,
}

impl FavoritesWatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to future ticks. A late subscriber sees only changes made
    /// after this call.
    pub fn subscribe(&self) -> Receiver<()> {
        let (tx, rx) = channel();
        self.subscribers.lock().unwrap().push(tx);
        rx
    }

    /// Broadcast one tick to every live subscriber, pruning any whose
    /// receiver has been dropped.
    pub(crate) fn notify(&self) {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|tx| tx.send(()).is_ok());
    }
}
