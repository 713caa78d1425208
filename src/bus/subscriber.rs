// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use super::message::EventBusMessage;

/// An event-bus consumer.
///
/// Each subscription moves its subscriber into a dedicated worker task that
/// drains the subscription's mailbox one message at a time, so `on_msg`
/// runs strictly sequentially and may mutate state freely.
///
/// Failures are contained: an error return or a panic is logged and
/// swallowed, the worker keeps draining, and the subscription stays
/// registered. A subscriber that needs failures to be visible should route
/// them itself (a channel, a counter, a log).
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use keanu::bus::{EventBusMessage, Subscriber};
///
/// struct Printer;
///
/// #[async_trait]
/// impl Subscriber<String> for Printer {
///     async fn on_msg(&mut self, msg: EventBusMessage<String>) -> anyhow::Result<()> {
///         println!("[{}] {}", msg.topic, msg.payload);
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Subscriber<T: Send + 'static>: Send + 'static {
    /// Handle one delivered message.
    async fn on_msg(&mut self, msg: EventBusMessage<T>) -> anyhow::Result<()>;
}
