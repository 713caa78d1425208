//! The core `Actor` trait.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use crate::message::AnyMessage;

/// Outcome of dispatching one message to an actor.
///
/// The runtime needs to tell "the handler declined this message" apart from
/// "the handler failed": a declined message becomes a dead letter, a failure
/// restarts the actor. Returning the message inside `Unhandled` lets the
/// runtime record it without cloning.
#[derive(Debug)]
pub enum Receive {
    /// The message was processed.
    Handled,
    /// The handler does not cover this message; hand it back for the
    /// dead-letter queue.
    Unhandled(AnyMessage),
}

/// A message handler with private state, driven by a dedicated worker task.
///
/// `on_msg` is invoked strictly sequentially per actor, so implementations
/// may mutate their state freely without further synchronization. Messages
/// arrive type-erased; handlers downcast the payloads they understand and
/// return [`Receive::Unhandled`] for everything else.
///
/// Returning an error (or panicking) terminates the current instance; the
/// runtime then creates a fresh instance from the registered
/// [`ActorProps`](crate::actor::ActorProps) on the *same* mailbox, so
/// pending messages survive the crash. The failing message itself is not
/// redelivered.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use keanu::actor::{Actor, AnyMessage, Receive};
///
/// struct Counter {
///     count: u64,
/// }
///
/// #[async_trait]
/// impl Actor for Counter {
///     async fn on_msg(&mut self, msg: AnyMessage) -> anyhow::Result<Receive> {
///         match msg.downcast::<u64>() {
///             Ok(delta) => {
///                 self.count += delta;
///                 Ok(Receive::Handled)
///             }
///             Err(other) => Ok(Receive::Unhandled(other)),
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Actor: Send + 'static {
    /// Handle one message.
    async fn on_msg(&mut self, msg: AnyMessage) -> anyhow::Result<Receive>;
}
