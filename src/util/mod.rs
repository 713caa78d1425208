//! Shared identifier types.
//!
//! - [`ActorRef`] - logical actor identity (name + prop id), used as a map key
//! - [`SubscriptionId`] - unique id for an event-bus subscription

pub mod ids;

pub use ids::{ActorRef, SubscriptionId};
