//! Dead letters: messages the system could not hand to an actor.

// Layer 1: Standard library imports
use std::collections::VecDeque;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

// Layer 3: Internal module imports
use crate::message::AnyMessage;
use crate::util::ActorRef;

/// Why a message ended up in the dead-letter queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeadLetterReason {
    /// The actor's handler declined the message.
    UnhandledMessage,

    /// The message was still queued when its actor stopped during shutdown.
    DeliveryAfterShutdown,

    /// The message was queued for an actor that could never start.
    UnknownRecipient,
}

/// Record of one undeliverable message.
///
/// The payload is shared, not cloned: readers of the queue receive the same
/// [`AnyMessage`] the sender enqueued and can downcast it for inspection.
#[derive(Debug, Clone)]
pub struct DeadLetter {
    /// The undelivered payload
    pub message: Arc<AnyMessage>,
    /// The actor the message was addressed to
    pub recipient: ActorRef,
    /// When the dead letter was recorded
    pub timestamp: DateTime<Utc>,
    /// Why delivery failed
    pub reason: DeadLetterReason,
}

impl DeadLetter {
    pub(crate) fn new(message: AnyMessage, recipient: ActorRef, reason: DeadLetterReason) -> Self {
        Self {
            message: Arc::new(message),
            recipient,
            timestamp: Utc::now(),
            reason,
        }
    }
}

/// Bounded FIFO of dead letters.
///
/// A push onto a full queue drops the incoming entry; the oldest surviving
/// entries are retained. Reads are non-destructive snapshots.
pub(crate) struct DeadLetterQueue {
    capacity: usize,
    entries: Mutex<VecDeque<DeadLetter>>,
}

impl DeadLetterQueue {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::new()),
        }
    }

    pub(crate) fn push(&self, letter: DeadLetter) {
        let mut entries = self.entries.lock();
        if entries.len() >= self.capacity {
            debug!(
                recipient = %letter.recipient,
                reason = ?letter.reason,
                "dead-letter queue full, dropping entry"
            );
            return;
        }
        entries.push_back(letter);
    }

    /// Up to `limit` entries, oldest first, without removing them.
    pub(crate) fn snapshot(&self, limit: usize) -> Vec<DeadLetter> {
        self.entries.lock().iter().take(limit).cloned().collect()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn letter(n: i32) -> DeadLetter {
        DeadLetter::new(
            AnyMessage::new(n),
            ActorRef::new("a", "T"),
            DeadLetterReason::UnhandledMessage,
        )
    }

    #[test]
    fn test_push_and_snapshot_fifo() {
        let queue = DeadLetterQueue::new(10);
        for n in 0..5 {
            queue.push(letter(n));
        }

        let snapshot = queue.snapshot(3);
        assert_eq!(snapshot.len(), 3);
        let values: Vec<i32> = snapshot
            .iter()
            .map(|l| *l.message.downcast_ref::<i32>().unwrap())
            .collect();
        assert_eq!(values, vec![0, 1, 2]);

        // Snapshot does not consume.
        assert_eq!(queue.len(), 5);
    }

    #[test]
    fn test_overflow_drops_incoming() {
        let queue = DeadLetterQueue::new(2);
        queue.push(letter(1));
        queue.push(letter(2));
        queue.push(letter(3));

        let values: Vec<i32> = queue
            .snapshot(10)
            .iter()
            .map(|l| *l.message.downcast_ref::<i32>().unwrap())
            .collect();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn test_snapshot_beyond_len() {
        let queue = DeadLetterQueue::new(4);
        queue.push(letter(9));
        assert_eq!(queue.snapshot(100).len(), 1);
    }

    #[test]
    fn test_reason_serde() {
        let json = serde_json::to_string(&DeadLetterReason::DeliveryAfterShutdown).unwrap();
        let back: DeadLetterReason = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DeadLetterReason::DeliveryAfterShutdown);
    }
}
