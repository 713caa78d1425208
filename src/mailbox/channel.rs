//! Capacity-dispatching mailbox implementation over tokio mpsc channels.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use tokio::sync::mpsc;

// Layer 3: Internal module imports
// (none)

/// Mailbox capacity configuration.
///
/// # Example
///
/// ```rust
/// use keanu::mailbox::MailboxCapacity;
///
/// assert_ne!(MailboxCapacity::Bounded(64), MailboxCapacity::Unbounded);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailboxCapacity {
    /// Bounded mailbox with a maximum number of queued messages
    Bounded(usize),
    /// Unbounded mailbox (no capacity limit)
    Unbounded,
}

/// Mailbox operation errors.
#[derive(Debug, thiserror::Error)]
pub enum MailboxError {
    /// Mailbox is full (bounded mailboxes only)
    #[error("mailbox is full (capacity: {capacity})")]
    Full { capacity: usize },

    /// Mailbox is closed (receiver dropped)
    #[error("mailbox is closed")]
    Closed,
}

/// Non-blocking receive errors.
#[derive(Debug, thiserror::Error)]
pub enum TryRecvError {
    /// No messages are currently queued
    #[error("mailbox is empty")]
    Empty,

    /// All senders are gone and the queue is drained
    #[error("mailbox is closed")]
    Closed,
}

/// Create a mailbox with the given capacity.
///
/// Returns the producer half first, consumer half second. The sender clones
/// cheaply; the receiver is owned by exactly one worker.
pub fn mailbox<T: Send>(capacity: MailboxCapacity) -> (MailboxSender<T>, MailboxReceiver<T>) {
    match capacity {
        MailboxCapacity::Bounded(limit) => {
            let (tx, rx) = mpsc::channel(limit);
            (
                MailboxSender {
                    inner: SenderInner::Bounded { tx, limit },
                },
                MailboxReceiver {
                    inner: ReceiverInner::Bounded(rx),
                },
            )
        }
        MailboxCapacity::Unbounded => {
            let (tx, rx) = mpsc::unbounded_channel();
            (
                MailboxSender {
                    inner: SenderInner::Unbounded(tx),
                },
                MailboxReceiver {
                    inner: ReceiverInner::Unbounded(rx),
                },
            )
        }
    }
}

enum SenderInner<T> {
    Bounded { tx: mpsc::Sender<T>, limit: usize },
    Unbounded(mpsc::UnboundedSender<T>),
}

impl<T> Clone for SenderInner<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Bounded { tx, limit } => Self::Bounded {
                tx: tx.clone(),
                limit: *limit,
            },
            Self::Unbounded(tx) => Self::Unbounded(tx.clone()),
        }
    }
}

/// Producer half of a mailbox.
pub struct MailboxSender<T> {
    inner: SenderInner<T>,
}

impl<T> Clone for MailboxSender<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Send> MailboxSender<T> {
    /// Send a message, suspending while a bounded mailbox is full.
    ///
    /// Unbounded sends never suspend.
    ///
    /// # Errors
    ///
    /// Returns [`MailboxError::Closed`] when the receiver is gone.
    pub async fn send(&self, message: T) -> Result<(), MailboxError> {
        match &self.inner {
            SenderInner::Bounded { tx, .. } => {
                tx.send(message).await.map_err(|_| MailboxError::Closed)
            }
            SenderInner::Unbounded(tx) => tx.send(message).map_err(|_| MailboxError::Closed),
        }
    }

    /// Send a message without suspending.
    ///
    /// # Errors
    ///
    /// Returns [`MailboxError::Full`] when a bounded mailbox has no room and
    /// [`MailboxError::Closed`] when the receiver is gone.
    pub fn try_send(&self, message: T) -> Result<(), MailboxError> {
        match &self.inner {
            SenderInner::Bounded { tx, limit } => tx.try_send(message).map_err(|err| match err {
                mpsc::error::TrySendError::Full(_) => MailboxError::Full { capacity: *limit },
                mpsc::error::TrySendError::Closed(_) => MailboxError::Closed,
            }),
            SenderInner::Unbounded(tx) => tx.send(message).map_err(|_| MailboxError::Closed),
        }
    }

    /// Send without suspending, handing the message back on failure.
    ///
    /// Used on the hot delivery path where the caller re-routes the message
    /// (retry on a fresh mailbox, dead letter) instead of reporting an error.
    pub(crate) fn send_or_return(&self, message: T) -> Result<(), T> {
        match &self.inner {
            SenderInner::Bounded { tx, .. } => {
                tx.try_send(message).map_err(|err| err.into_inner())
            }
            SenderInner::Unbounded(tx) => tx.send(message).map_err(|err| err.0),
        }
    }

    /// Get the mailbox capacity configuration.
    pub fn capacity(&self) -> MailboxCapacity {
        match &self.inner {
            SenderInner::Bounded { limit, .. } => MailboxCapacity::Bounded(*limit),
            SenderInner::Unbounded(_) => MailboxCapacity::Unbounded,
        }
    }

    /// Check whether the receiving half is gone.
    pub fn is_closed(&self) -> bool {
        match &self.inner {
            SenderInner::Bounded { tx, .. } => tx.is_closed(),
            SenderInner::Unbounded(tx) => tx.is_closed(),
        }
    }
}

enum ReceiverInner<T> {
    Bounded(mpsc::Receiver<T>),
    Unbounded(mpsc::UnboundedReceiver<T>),
}

/// Consumer half of a mailbox. Owned by exactly one worker.
pub struct MailboxReceiver<T> {
    inner: ReceiverInner<T>,
}

impl<T: Send> MailboxReceiver<T> {
    /// Receive the next message, suspending while the mailbox is empty.
    ///
    /// Returns `None` once every sender is gone and the queue is drained.
    pub async fn recv(&mut self) -> Option<T> {
        match &mut self.inner {
            ReceiverInner::Bounded(rx) => rx.recv().await,
            ReceiverInner::Unbounded(rx) => rx.recv().await,
        }
    }

    /// Receive without suspending.
    pub fn try_recv(&mut self) -> Result<T, TryRecvError> {
        let result = match &mut self.inner {
            ReceiverInner::Bounded(rx) => rx.try_recv(),
            ReceiverInner::Unbounded(rx) => rx.try_recv(),
        };
        result.map_err(|err| match err {
            mpsc::error::TryRecvError::Empty => TryRecvError::Empty,
            mpsc::error::TryRecvError::Disconnected => TryRecvError::Closed,
        })
    }

    /// Close the mailbox to further sends. Already queued messages remain
    /// receivable via [`try_recv`](Self::try_recv).
    pub fn close(&mut self) {
        match &mut self.inner {
            ReceiverInner::Bounded(rx) => rx.close(),
            ReceiverInner::Unbounded(rx) => rx.close(),
        }
    }
}
