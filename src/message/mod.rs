//! Type-erased message values exchanged through actor mailboxes.

pub mod any;

pub use any::{AnyMessage, PoisonPill};
