//! Heterogeneous message payloads.
//!
//! Actor mailboxes are deliberately untyped: domain messages of any type mix
//! with the [`PoisonPill`] sentinel in the same queue. [`AnyMessage`] erases
//! the payload type while retaining its name for diagnostics, and offers
//! checked downcasts for handlers that pattern-match on concrete types.

// Layer 1: Standard library imports
use std::any::{type_name, Any};
use std::fmt;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
// (none)

/// A type-erased, thread-safe message payload.
///
/// Payloads must be `Send + Sync + 'static` so messages can cross task
/// boundaries and dead-letter snapshots can be shared without cloning the
/// payload itself.
///
/// # Example
///
/// ```rust
/// use keanu::actor::AnyMessage;
///
/// let msg = AnyMessage::new(42_i32);
/// assert!(msg.is::<i32>());
/// assert_eq!(msg.downcast_ref::<i32>(), Some(&42));
/// assert_eq!(msg.downcast::<i32>().ok(), Some(42));
/// ```
pub struct AnyMessage {
    payload: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl AnyMessage {
    /// Wrap a payload value.
    pub fn new<M: Any + Send + Sync>(payload: M) -> Self {
        Self {
            payload: Box::new(payload),
            type_name: type_name::<M>(),
        }
    }

    /// Check whether the payload is of type `M`.
    pub fn is<M: Any>(&self) -> bool {
        self.payload.is::<M>()
    }

    /// Borrow the payload as `M`, if that is its type.
    pub fn downcast_ref<M: Any>(&self) -> Option<&M> {
        self.payload.downcast_ref::<M>()
    }

    /// Take the payload as `M`, handing the message back on a type mismatch.
    pub fn downcast<M: Any>(self) -> Result<M, AnyMessage> {
        let type_name = self.type_name;
        match self.payload.downcast::<M>() {
            Ok(payload) => Ok(*payload),
            Err(payload) => Err(Self { payload, type_name }),
        }
    }

    /// The fully qualified type name of the payload, captured at wrap time.
    pub fn payload_type(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for AnyMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnyMessage({})", self.type_name)
    }
}

/// Sentinel message that terminates the receiving actor's worker normally.
///
/// Sending a `PoisonPill` through [`tell`](crate::system::ActorSystem::tell)
/// causes the target worker to stop after the messages already queued ahead
/// of it have been processed. The pill itself is never passed to
/// [`Actor::on_msg`](crate::actor::Actor::on_msg).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoisonPill;
