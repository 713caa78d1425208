//! # keanu - Lightweight Actor Runtime, Event Bus, and Resource Pool
//!
//! Three interlocking concurrency building blocks for tokio applications:
//!
//! - An **actor system**: named actors, each with its own FIFO mailbox and
//!   worker task, supervised with restart-on-failure that keeps the mailbox
//!   (and its pending messages) alive across crashes.
//! - An **event bus**: topic-tagged, filtered publish/subscribe where every
//!   subscriber owns a mailbox and a dedicated worker, and delivery is
//!   resilient to failing filters and handlers.
//! - A **resource pool**: a bounded, lazily filled pool with
//!   validate-on-return semantics for things like database connections.
//!
//! The actor system and the event bus share the same mailbox-plus-worker
//! pattern; the pool is independent and usable from actors and plain
//! application code alike.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use async_trait::async_trait;
//! use keanu::prelude::*;
//!
//! struct Greeter;
//!
//! #[async_trait]
//! impl Actor for Greeter {
//!     async fn on_msg(&mut self, msg: AnyMessage) -> anyhow::Result<Receive> {
//!         match msg.downcast::<String>() {
//!             Ok(name) => {
//!                 println!("hello, {name}");
//!                 Ok(Receive::Handled)
//!             }
//!             Err(other) => Ok(Receive::Unhandled(other)),
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let system = ActorSystem::new(SystemConfig::default());
//!     system.register_prop(ActorProps::new(|| Greeter))?;
//!
//!     system.tell::<Greeter, _>("greeter", "world".to_string())?;
//!     system.tell::<Greeter, _>("greeter", PoisonPill)?;
//!
//!     system.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! # Design Notes
//!
//! Actors are heterogeneously typed on purpose: domain messages of any
//! `Send + Sync` type share a mailbox with the [`PoisonPill`] sentinel, and
//! handlers downcast what they understand. Messages a handler declines
//! become [dead letters](system::DeadLetter); messages that make a handler
//! fail cost that one message and a fresh actor instance, nothing more.
//!
//! Every actor and every subscriber is one tokio task. Blocking on an empty
//! mailbox suspends the task, not an OS thread, so thousands of actors are
//! cheap.
//!
//! # Module Organization
//!
//! - [`actor`] - the `Actor` trait, props factories, lifecycle events
//! - [`system`] - the `ActorSystem`: delivery, supervision, dead letters
//! - [`bus`] - the `EventBus` and `Subscriber` trait
//! - [`pool`] - the `ResourcePool` and `ResourceFactory` trait
//! - [`mailbox`] - shared FIFO mailbox plumbing
//! - [`monitor`] - lifecycle observation hooks
//! - [`util`] - `ActorRef` and `SubscriptionId`

pub mod actor;
pub mod bus;
pub mod mailbox;
pub mod message;
pub mod monitor;
pub mod pool;
pub mod prelude;
pub mod system;
pub mod util;

// Re-export commonly used types
pub use actor::{Actor, ActorProps, AnyMessage, LifecycleEvent, PoisonPill, Receive};
pub use bus::{EventBus, EventBusMessage, PublishError, Subscriber};
pub use mailbox::MailboxCapacity;
pub use monitor::{InMemoryMonitor, LifecycleMonitor, NoopMonitor};
pub use pool::{PoolError, PoolGuard, ResourceFactory, ResourcePool};
pub use system::{
    ActorSystem, DeadLetter, DeadLetterReason, RestartLimit, SystemConfig, SystemError,
};
pub use util::{ActorRef, SubscriptionId};
