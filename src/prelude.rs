//! Convenience re-exports for the common case.
//!
//! ```rust
//! use keanu::prelude::*;
//! ```

pub use crate::actor::{Actor, ActorProps, AnyMessage, LifecycleEvent, PoisonPill, Receive};
pub use crate::bus::{EventBus, EventBusMessage, PublishError, Subscriber};
pub use crate::mailbox::MailboxCapacity;
pub use crate::monitor::{InMemoryMonitor, LifecycleMonitor, NoopMonitor};
pub use crate::pool::{PoolError, PoolGuard, ResourceFactory, ResourcePool};
pub use crate::system::{
    ActorSystem, DeadLetter, DeadLetterReason, RestartLimit, SystemConfig, SystemError,
};
pub use crate::util::{ActorRef, SubscriptionId};
