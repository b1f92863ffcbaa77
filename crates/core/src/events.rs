//! "Benchmark updated" notification channel
//!
//! Any component that persists a new result calls [`Notifier::notify`]; the
//! dashboard controller holds a [`Subscription`] and reloads from storage when
//! it sees one. The signal carries no payload.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use tracing::debug;

/// Payload-less signal: "check persisted state again"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkUpdated;

/// Fire-and-forget broadcaster
#[derive(Debug, Default)]
pub struct Notifier {
    subscribers: Vec<Sender<BenchmarkUpdated>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Subscription {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        Subscription { rx }
    }

    /// Broadcast to every live subscription; dropped ones are pruned
    pub fn notify(&mut self) {
        self.subscribers
            .retain(|tx| tx.send(BenchmarkUpdated).is_ok());
        debug!("Notified {} subscriber(s)", self.subscribers.len());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[derive(Debug)]
pub struct Subscription {
    rx: Receiver<BenchmarkUpdated>,
}

impl Subscription {
    /// Drain pending notifications; true if at least one arrived
    pub fn drain(&self) -> bool {
        let mut received = false;
        loop {
            match self.rx.try_recv() {
                Ok(BenchmarkUpdated) => received = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return received,
            }
        }
    }
}
