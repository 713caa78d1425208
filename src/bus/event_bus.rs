//! The event bus: subscription registry and resilient fan-out delivery.

// Layer 1: Standard library imports
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use futures::FutureExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

// Layer 3: Internal module imports
use super::error::PublishError;
use super::message::EventBusMessage;
use super::subscriber::Subscriber;
use crate::mailbox::{mailbox, MailboxCapacity, MailboxReceiver, MailboxSender};
use crate::util::SubscriptionId;

type Filter<T> = Arc<dyn Fn(&EventBusMessage<T>) -> bool + Send + Sync>;
type ErrorHook<T> = Arc<dyn Fn(&PublishError, &EventBusMessage<T>, SubscriptionId) + Send + Sync>;

struct Subscription<T> {
    sender: MailboxSender<EventBusMessage<T>>,
    filter: Filter<T>,
    worker: JoinHandle<()>,
}

/// Topic-tagged publish/subscribe with one mailbox and worker per
/// subscriber.
///
/// Subscribing moves the subscriber into a dedicated worker task and
/// returns a [`SubscriptionId`], which is the subscription's identity for
/// later removal. Publishing walks a snapshot of the registry, applies each
/// subscription's filter, and enqueues the message where the filter holds.
///
/// Failures never escape `publish`: a panicking filter or an unreachable
/// mailbox is reported to the error hook and the fan-out continues. The
/// hook runs synchronously on the publisher's task and must not block.
///
/// Cloning the bus is cheap and shares the registry.
///
/// # Example
///
/// ```rust,ignore
/// let bus: EventBus<i32> = EventBus::new();
/// let id = bus.subscribe_filtered(Totals::default(), |msg| msg.topic == "orders");
/// bus.publish_to("orders", 17).await;
/// bus.unsubscribe(id);
/// ```
pub struct EventBus<T> {
    subscriptions: Arc<DashMap<SubscriptionId, Subscription<T>>>,
    error_hook: ErrorHook<T>,
}

impl<T: Clone + Send + 'static> EventBus<T> {
    /// Create a bus whose error hook discards delivery failures.
    pub fn new() -> Self {
        Self {
            subscriptions: Arc::new(DashMap::new()),
            error_hook: Arc::new(|_, _, _| {}),
        }
    }

    /// Create a bus with a delivery-failure hook.
    ///
    /// The hook is called synchronously on the publisher's task, once per
    /// failing subscription; it must return quickly and must not block.
    pub fn with_error_hook(
        hook: impl Fn(&PublishError, &EventBusMessage<T>, SubscriptionId) + Send + Sync + 'static,
    ) -> Self {
        Self {
            subscriptions: Arc::new(DashMap::new()),
            error_hook: Arc::new(hook),
        }
    }

    /// Subscribe with no filter (every message matches).
    pub fn subscribe(&self, subscriber: impl Subscriber<T>) -> SubscriptionId {
        self.subscribe_with(subscriber, |_| true, MailboxCapacity::Unbounded)
    }

    /// Subscribe with a message filter.
    ///
    /// The filter runs on the publisher's task for every published message;
    /// keep it cheap. A panicking filter is reported to the error hook and
    /// does not remove the subscription.
    pub fn subscribe_filtered(
        &self,
        subscriber: impl Subscriber<T>,
        filter: impl Fn(&EventBusMessage<T>) -> bool + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.subscribe_with(subscriber, filter, MailboxCapacity::Unbounded)
    }

    /// Subscribe with a filter and an explicit mailbox capacity.
    ///
    /// With a bounded mailbox, publishers suspend while the mailbox is full
    /// instead of dropping messages.
    pub fn subscribe_with(
        &self,
        subscriber: impl Subscriber<T>,
        filter: impl Fn(&EventBusMessage<T>) -> bool + Send + Sync + 'static,
        capacity: MailboxCapacity,
    ) -> SubscriptionId {
        let id = SubscriptionId::new();
        let (sender, receiver) = mailbox(capacity);
        let worker = spawn_subscriber_worker(id, subscriber, receiver);
        self.subscriptions.insert(
            id,
            Subscription {
                sender,
                filter: Arc::new(filter),
                worker,
            },
        );
        debug!(subscription = %id, "subscriber registered");
        id
    }

    /// Publish a message to every subscription whose filter matches.
    ///
    /// Fire-and-forget: per-subscription failures go to the error hook and
    /// the call itself never fails. Suspends only while a matching bounded
    /// mailbox is full.
    pub async fn publish(&self, msg: EventBusMessage<T>) {
        let snapshot: Vec<(SubscriptionId, Filter<T>, MailboxSender<EventBusMessage<T>>)> = self
            .subscriptions
            .iter()
            .map(|entry| {
                (
                    *entry.key(),
                    Arc::clone(&entry.value().filter),
                    entry.value().sender.clone(),
                )
            })
            .collect();

        for (id, filter, sender) in snapshot {
            let matches = std::panic::catch_unwind(AssertUnwindSafe(|| filter(&msg)));
            match matches {
                Err(_) => (self.error_hook)(&PublishError::FilterPanicked, &msg, id),
                Ok(false) => {}
                Ok(true) => {
                    if let Err(error) = sender.send(msg.clone()).await {
                        (self.error_hook)(&PublishError::Delivery(error), &msg, id);
                    }
                }
            }
        }
    }

    /// Publish a payload under a topic.
    pub async fn publish_to(&self, topic: impl Into<String>, payload: T) {
        self.publish(EventBusMessage::new(topic, payload)).await;
    }

    /// Publish a payload with no topic (the empty string).
    pub async fn publish_untopiced(&self, payload: T) {
        self.publish(EventBusMessage::untopiced(payload)).await;
    }

    /// Remove one subscription and stop its worker.
    ///
    /// An in-flight message may or may not still be handled; subsequent
    /// messages never are. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        if let Some((_, subscription)) = self.subscriptions.remove(&id) {
            subscription.worker.abort();
            debug!(subscription = %id, "subscriber removed");
        }
    }

    /// Remove several subscriptions and stop their workers.
    pub fn unsubscribe_all(&self, ids: impl IntoIterator<Item = SubscriptionId>) {
        for id in ids {
            self.unsubscribe(id);
        }
    }

    /// Stop every subscriber and clear the registry. Idempotent.
    pub fn shutdown(&self) {
        let ids: Vec<SubscriptionId> = self
            .subscriptions
            .iter()
            .map(|entry| *entry.key())
            .collect();
        self.unsubscribe_all(ids);
    }

    /// Number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

impl<T: Clone + Send + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self {
            subscriptions: Arc::clone(&self.subscriptions),
            error_hook: Arc::clone(&self.error_hook),
        }
    }
}

/// One subscriber worker: drain the mailbox, contain handler failures.
fn spawn_subscriber_worker<T: Send + 'static>(
    id: SubscriptionId,
    mut subscriber: impl Subscriber<T>,
    mut receiver: MailboxReceiver<EventBusMessage<T>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = receiver.recv().await {
            match AssertUnwindSafe(subscriber.on_msg(msg)).catch_unwind().await {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    warn!(subscription = %id, "subscriber handler failed: {error:#}");
                }
                Err(_panic) => {
                    warn!(subscription = %id, "subscriber handler panicked");
                }
            }
        }
    })
}
