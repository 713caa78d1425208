//! FIFO mailboxes shared by actor workers and event-bus subscribers.
//!
//! A mailbox is a single-consumer queue with any number of producers. Actors
//! always use unbounded mailboxes; event-bus subscribers may opt into a
//! bounded one, in which case senders suspend while the mailbox is full.
//!
//! # Components
//!
//! - [`mailbox`] - construct a sender/receiver pair for a capacity
//! - [`MailboxSender`] / [`MailboxReceiver`] - the two channel halves
//! - [`MailboxCapacity`] - bounded or unbounded configuration
//! - [`MailboxError`] / [`TryRecvError`] - operation errors

pub mod channel;

pub use channel::{
    mailbox, MailboxCapacity, MailboxError, MailboxReceiver, MailboxSender, TryRecvError,
};
