//! Worker lifecycle events.

// Layer 1: Standard library imports
use std::fmt::{self, Display};

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
// (none)

/// How an actor worker ended, or why it is about to restart.
///
/// Every worker produces exactly one terminal event; a worker whose handler
/// failed additionally produces one [`HandlerFailed`](Self::HandlerFailed)
/// per crash before it restarts on the retained mailbox. Events are
/// observable through a [`LifecycleMonitor`](crate::monitor::LifecycleMonitor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    /// The worker consumed a poison pill and stopped normally.
    PoisonPill,

    /// The mailbox was closed from outside the worker.
    Interrupted,

    /// The props were missing or the factory failed; the actor never
    /// started. Also the terminal event of a worker whose restart budget
    /// ran out.
    InitFailed,

    /// The worker task was cancelled.
    Cancelled,

    /// `on_msg` failed; a fresh instance restarts on the same mailbox.
    HandlerFailed {
        /// Rendered failure (error chain or panic message).
        cause: String,
    },

    /// The worker loop ended without an exit signal. Not produced by the
    /// current runtime; kept so observers can match exhaustively.
    Unexpected,
}

impl LifecycleEvent {
    /// Whether this event removes the actor (mailbox and worker) rather
    /// than restarting it.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::HandlerFailed { .. })
    }
}

impl Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PoisonPill => write!(f, "terminated by poison pill"),
            Self::Interrupted => write!(f, "interrupted"),
            Self::InitFailed => write!(f, "initialization failed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::HandlerFailed { cause } => write!(f, "handler failed: {cause}"),
            Self::Unexpected => write!(f, "terminated unexpectedly"),
        }
    }
}
