//! Actor abstractions: the handler trait, props factories, and lifecycle
//! events.
//!
//! # Components
//!
//! - [`Actor`] - the single-method handler trait all actors implement
//! - [`Receive`] - handled / unhandled outcome of a dispatch
//! - [`ActorProps`] - factory for fresh actor instances, keyed by prop id
//! - [`LifecycleEvent`] - how a worker ended (or crashed and restarted)
//!
//! Actors are values with private state. They never see their mailbox, their
//! worker task, or the control envelope; the runtime hands them one payload
//! at a time and reacts to the outcome.

pub mod lifecycle;
pub mod props;
pub mod traits;

pub use crate::message::{AnyMessage, PoisonPill};
pub use lifecycle::LifecycleEvent;
pub use props::ActorProps;
pub use traits::{Actor, Receive};
