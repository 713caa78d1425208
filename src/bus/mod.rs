//! Topic-tagged, filtered publish/subscribe with per-subscriber mailboxes.
//!
//! # Components
//!
//! - [`EventBus`] - the bus: subscription registry plus delivery
//! - [`EventBusMessage`] - topic + payload envelope
//! - [`Subscriber`] - the consumer trait, driven by a dedicated worker
//! - [`PublishError`] - delivery failures, reported via the error hook
//!
//! Delivery is resilient: a throwing filter or a dead mailbox is reported to
//! the bus's error hook and never stops the fan-out, and a failing handler
//! never kills its worker. Ordering is FIFO per subscriber only.

pub mod error;
pub mod event_bus;
pub mod message;
pub mod subscriber;

pub use crate::util::SubscriptionId;
pub use error::PublishError;
pub use event_bus::EventBus;
pub use message::EventBusMessage;
pub use subscriber::Subscriber;
