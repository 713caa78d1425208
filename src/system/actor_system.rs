//! Actor system implementation: registries, delivery, worker supervision.

// Layer 1: Standard library
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, warn};

// Layer 3: Internal
use super::config::SystemConfig;
use super::dead_letter::{DeadLetter, DeadLetterQueue, DeadLetterReason};
use super::error::SystemError;
use super::restart::RestartBudget;
use crate::actor::{Actor, ActorProps, LifecycleEvent, Receive};
use crate::mailbox::{mailbox, MailboxCapacity, MailboxReceiver, MailboxSender};
use crate::message::{AnyMessage, PoisonPill};
use crate::monitor::{LifecycleMonitor, NoopMonitor};
use crate::util::ActorRef;

/// Control envelope carried by actor mailboxes. Never exposed: user code
/// sends plain payloads and the [`PoisonPill`] marker.
#[derive(Debug)]
enum Envelope {
    User(AnyMessage),
    Poison,
}

type PropFactory = Arc<dyn Fn() -> Box<dyn Actor> + Send + Sync>;

/// The actor system: named actors, each with its own mailbox and worker.
///
/// Actors are keyed by [`ActorRef`] (name + prop id). Delivering to a name
/// that has no running worker lazily creates the mailbox and spawns the
/// worker from the registered [`ActorProps`]. A worker whose handler fails
/// is restarted as a fresh instance **on the same mailbox**, so messages
/// queued behind the failure survive; the failing message itself is
/// consumed, not redelivered.
///
/// The system exclusively owns mailboxes, worker handles, props, and the
/// dead-letter queue; worker handles never leak through the API. Cloning
/// the system is cheap and shares all state.
///
/// # Example
///
/// ```rust,ignore
/// let system = ActorSystem::new(SystemConfig::default());
/// system.register_prop(ActorProps::new(|| Counter { count: 0 }))?;
/// system.tell::<Counter, _>("billing", 5_u64)?;
/// system.tell::<Counter, _>("billing", PoisonPill)?;
/// assert!(system.shutdown_await(Duration::from_secs(1)).await);
/// ```
pub struct ActorSystem {
    inner: Arc<SystemInner>,
}

struct SystemInner {
    config: SystemConfig,
    monitor: Arc<dyn LifecycleMonitor>,
    props: DashMap<String, PropFactory>,
    mailboxes: DashMap<ActorRef, MailboxSender<Envelope>>,
    workers: DashMap<ActorRef, JoinHandle<()>>,
    dead_letters: DeadLetterQueue,
    shutting_down: AtomicBool,
}

impl ActorSystem {
    /// Create a system with the given configuration and no lifecycle
    /// observer.
    pub fn new(config: SystemConfig) -> Self {
        Self::with_monitor(config, Arc::new(NoopMonitor))
    }

    /// Create a system that reports worker lifecycle events to `monitor`.
    pub fn with_monitor(config: SystemConfig, monitor: Arc<dyn LifecycleMonitor>) -> Self {
        let dead_letters = DeadLetterQueue::new(config.dead_letter_capacity);
        Self {
            inner: Arc::new(SystemInner {
                config,
                monitor,
                props: DashMap::new(),
                mailboxes: DashMap::new(),
                workers: DashMap::new(),
                dead_letters,
                shutting_down: AtomicBool::new(false),
            }),
        }
    }

    /// Get the system configuration.
    pub fn config(&self) -> &SystemConfig {
        &self.inner.config
    }

    /// Register props under their identifier.
    ///
    /// Registering an identifier twice replaces the previous props; workers
    /// created afterwards (including restarts) use the new factory.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::InvalidArgument`] for an empty identifier.
    pub fn register_prop<A: Actor>(&self, props: ActorProps<A>) -> Result<(), SystemError> {
        if props.identifier().is_empty() {
            return Err(SystemError::InvalidArgument(
                "prop identifier must not be empty".to_string(),
            ));
        }
        let (identifier, create) = props.into_parts();
        let factory: PropFactory = Arc::new(move || Box::new(create()) as Box<dyn Actor>);
        self.inner.props.insert(identifier, factory);
        Ok(())
    }

    /// Deliver a message to the actor named `name` of kind `A`.
    ///
    /// The target ref is `(name, type name of A)`; the message type is
    /// inferred, so callers write `tell::<MyActor, _>(name, msg)`. A
    /// [`PoisonPill`] payload terminates the target worker after the
    /// messages queued ahead of it.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::InvalidArgument`] for an empty name and
    /// [`SystemError::ShuttingDown`] once shutdown has begun. Never fails
    /// for reasons internal to the runtime.
    pub fn tell<A, M>(&self, name: &str, msg: M) -> Result<(), SystemError>
    where
        A: Actor,
        M: Any + Send + Sync,
    {
        self.tell_ref(&ActorRef::of::<A>(name), msg)
    }

    /// Deliver a message to an explicit [`ActorRef`].
    ///
    /// The escape hatch for props registered under a custom identifier.
    ///
    /// # Errors
    ///
    /// As [`tell`](Self::tell).
    pub fn tell_ref(
        &self,
        actor: &ActorRef,
        msg: impl Any + Send + Sync,
    ) -> Result<(), SystemError> {
        if actor.name.is_empty() {
            return Err(SystemError::InvalidArgument(
                "actor name must not be empty".to_string(),
            ));
        }
        if actor.prop_id.is_empty() {
            return Err(SystemError::InvalidArgument(
                "actor prop id must not be empty".to_string(),
            ));
        }
        if self.inner.shutting_down.load(Ordering::SeqCst) {
            return Err(SystemError::ShuttingDown);
        }

        let message = AnyMessage::new(msg);
        let envelope = if message.is::<PoisonPill>() {
            Envelope::Poison
        } else {
            Envelope::User(message)
        };
        self.deliver(actor, envelope);
        Ok(())
    }

    /// Number of live actors (refs with a mailbox).
    pub fn actor_count(&self) -> usize {
        self.inner.mailboxes.len()
    }

    /// Whether a worker is currently live for the given ref.
    pub fn is_alive(&self, actor: &ActorRef) -> bool {
        self.inner.mailboxes.contains_key(actor)
    }

    /// Whether shutdown has begun.
    pub fn is_shutdown(&self) -> bool {
        self.inner.shutting_down.load(Ordering::SeqCst)
    }

    /// Up to `limit` dead letters, oldest first, without removing them.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::InvalidArgument`] when `limit` is zero.
    pub fn dead_letters(&self, limit: usize) -> Result<Vec<DeadLetter>, SystemError> {
        if limit == 0 {
            return Err(SystemError::InvalidArgument(
                "limit must be positive".to_string(),
            ));
        }
        Ok(self.inner.dead_letters.snapshot(limit))
    }

    /// Gracefully stop every actor, waiting up to `timeout`.
    ///
    /// Sets the shutdown flag (subsequent [`tell`](Self::tell) calls fail
    /// with [`SystemError::ShuttingDown`]), then repeatedly offers a poison
    /// pill to every mailbox and waits for the snapshotted workers to
    /// finish, until the actor table is empty or the deadline passes.
    ///
    /// Idempotent: a second call reports the current state immediately.
    /// Returns `true` iff no actors remain.
    pub async fn shutdown_await(&self, timeout_after: Duration) -> bool {
        if self.inner.shutting_down.swap(true, Ordering::SeqCst) {
            return self.inner.mailboxes.is_empty();
        }
        debug!(actors = self.actor_count(), "actor system shutting down");

        let deadline = Instant::now() + timeout_after;
        while !self.inner.mailboxes.is_empty() && Instant::now() < deadline {
            let ids: Vec<ActorRef> = self
                .inner
                .workers
                .iter()
                .map(|entry| entry.key().clone())
                .collect();

            for entry in self.inner.mailboxes.iter() {
                let _ = entry.value().try_send(Envelope::Poison);
            }

            if ids.is_empty() {
                // Workers are mid-teardown; give them a moment.
                sleep(Duration::from_millis(5)).await;
                continue;
            }

            for id in ids {
                let Some((_, mut handle)) = self.inner.workers.remove(&id) else {
                    continue;
                };
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    self.inner.workers.insert(id, handle);
                    break;
                }
                match timeout(remaining, &mut handle).await {
                    Ok(Ok(())) => {}
                    Ok(Err(join_error)) => {
                        // A cancelled or panicked worker never ran its own
                        // cleanup; the entry is removed on its behalf.
                        if join_error.is_cancelled() {
                            self.inner.monitor.record(&id, LifecycleEvent::Cancelled);
                        }
                        self.inner.mailboxes.remove(&id);
                    }
                    Err(_elapsed) => {
                        self.inner.workers.insert(id, handle);
                    }
                }
            }
        }

        self.inner.mailboxes.is_empty()
    }

    /// [`shutdown_await`](Self::shutdown_await) with the configured
    /// [`shutdown_timeout`](SystemConfig::shutdown_timeout).
    pub async fn shutdown(&self) -> bool {
        self.shutdown_await(self.inner.config.shutdown_timeout).await
    }

    /// Enqueue an envelope, creating mailbox and worker on first delivery.
    ///
    /// A send can race a worker that is tearing down; the stale mailbox is
    /// dropped and the send retried on a fresh one. The retry is bounded to
    /// keep a pathological props failure from looping; leftovers become
    /// dead letters.
    fn deliver(&self, actor: &ActorRef, envelope: Envelope) {
        let mut envelope = envelope;
        for _ in 0..8 {
            let sender = self.sender_for(actor);
            match sender.send_or_return(envelope) {
                Ok(()) => return,
                Err(returned) => {
                    envelope = returned;
                    self.inner
                        .mailboxes
                        .remove_if(actor, |_, stale| stale.is_closed());
                }
            }
        }
        if let Envelope::User(message) = envelope {
            self.inner.dead_letters.push(DeadLetter::new(
                message,
                actor.clone(),
                DeadLetterReason::UnknownRecipient,
            ));
        }
    }

    /// Get or create the mailbox for a ref, spawning its worker on create.
    fn sender_for(&self, actor: &ActorRef) -> MailboxSender<Envelope> {
        match self.inner.mailboxes.entry(actor.clone()) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(slot) => {
                let (tx, rx) = mailbox(MailboxCapacity::Unbounded);
                slot.insert(tx.clone());
                let handle = tokio::spawn(run_worker(
                    Arc::clone(&self.inner),
                    actor.clone(),
                    rx,
                ));
                self.inner.workers.insert(actor.clone(), handle);
                tx
            }
        }
    }
}

impl Clone for ActorSystem {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// One actor worker: instantiate, drain the mailbox, restart on failure.
async fn run_worker(inner: Arc<SystemInner>, actor_ref: ActorRef, mut rx: MailboxReceiver<Envelope>) {
    let mut budget = RestartBudget::new(inner.config.restart_limit.clone());
    let terminal = loop {
        let mut actor = match instantiate(&inner, &actor_ref) {
            Ok(actor) => actor,
            Err(error) => {
                warn!(actor = %actor_ref, %error, "actor failed to start");
                break LifecycleEvent::InitFailed;
            }
        };

        match drive(&inner, &actor_ref, actor.as_mut(), &mut rx).await {
            WorkerExit::Poison => break LifecycleEvent::PoisonPill,
            WorkerExit::MailboxClosed => break LifecycleEvent::Interrupted,
            WorkerExit::Failed(cause) => {
                inner.monitor.record(
                    &actor_ref,
                    LifecycleEvent::HandlerFailed {
                        cause: cause.clone(),
                    },
                );
                match budget.next_restart() {
                    Some(delay) => {
                        warn!(actor = %actor_ref, %cause, "actor failed, restarting on retained mailbox");
                        if !delay.is_zero() {
                            sleep(delay).await;
                        }
                    }
                    None => {
                        warn!(actor = %actor_ref, %cause, "actor exhausted its restart budget");
                        break LifecycleEvent::InitFailed;
                    }
                }
            }
        }
    };

    inner.monitor.record(&actor_ref, terminal.clone());
    debug!(actor = %actor_ref, event = %terminal, "actor worker stopped");

    // Terminal exit: the worker owns its registry entries and removes them.
    inner.mailboxes.remove(&actor_ref);
    rx.close();
    let drain_reason = match terminal {
        LifecycleEvent::PoisonPill => DeadLetterReason::DeliveryAfterShutdown,
        _ => DeadLetterReason::UnknownRecipient,
    };
    while let Ok(envelope) = rx.try_recv() {
        if let Envelope::User(message) = envelope {
            inner
                .dead_letters
                .push(DeadLetter::new(message, actor_ref.clone(), drain_reason));
        }
    }
    inner.workers.remove(&actor_ref);
}

/// Produce a fresh actor instance from the registered props.
fn instantiate(inner: &SystemInner, actor_ref: &ActorRef) -> Result<Box<dyn Actor>, SystemError> {
    let factory = inner
        .props
        .get(&actor_ref.prop_id)
        .map(|entry| Arc::clone(entry.value()))
        .ok_or_else(|| {
            SystemError::Instantiation(format!(
                "no props registered for `{}`",
                actor_ref.prop_id
            ))
        })?;
    std::panic::catch_unwind(AssertUnwindSafe(|| factory()))
        .map_err(|panic| SystemError::Instantiation(panic_cause(panic)))
}

enum WorkerExit {
    Poison,
    MailboxClosed,
    Failed(String),
}

/// Drain the mailbox into one actor instance until it stops or fails.
async fn drive(
    inner: &SystemInner,
    actor_ref: &ActorRef,
    actor: &mut dyn Actor,
    rx: &mut MailboxReceiver<Envelope>,
) -> WorkerExit {
    loop {
        let Some(envelope) = rx.recv().await else {
            return WorkerExit::MailboxClosed;
        };
        let message = match envelope {
            Envelope::Poison => return WorkerExit::Poison,
            Envelope::User(message) => message,
        };
        match AssertUnwindSafe(actor.on_msg(message)).catch_unwind().await {
            Ok(Ok(Receive::Handled)) => {}
            Ok(Ok(Receive::Unhandled(message))) => {
                debug!(actor = %actor_ref, payload = message.payload_type(), "unhandled message");
                inner.dead_letters.push(DeadLetter::new(
                    message,
                    actor_ref.clone(),
                    DeadLetterReason::UnhandledMessage,
                ));
            }
            Ok(Err(error)) => return WorkerExit::Failed(format!("{error:#}")),
            Err(panic) => return WorkerExit::Failed(panic_cause(panic)),
        }
    }
}

/// Render a panic payload for logs and lifecycle events.
fn panic_cause(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic".to_string()
    }
}
