//! Cross-component scenarios driving the public API end to end.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::{sleep, Instant};

use keanu::prelude::*;

async fn wait_until(timeout_ms: u64, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        sleep(Duration::from_millis(5)).await;
    }
    cond()
}

/// An actor that counts `"ok"` strings and fails on everything else it can
/// read as a string; non-strings are declined.
struct BoomActor {
    oks: Arc<AtomicUsize>,
}

#[async_trait]
impl Actor for BoomActor {
    async fn on_msg(&mut self, msg: AnyMessage) -> anyhow::Result<Receive> {
        match msg.downcast::<String>() {
            Ok(text) if text == "ok" => {
                self.oks.fetch_add(1, Ordering::SeqCst);
                Ok(Receive::Handled)
            }
            Ok(text) => anyhow::bail!("unexpected input: {text}"),
            Err(other) => Ok(Receive::Unhandled(other)),
        }
    }
}

#[tokio::test]
async fn restart_on_failure_keeps_mailbox_alive() {
    let monitor = Arc::new(InMemoryMonitor::new());
    let system = ActorSystem::with_monitor(SystemConfig::default(), Arc::clone(&monitor) as _);

    let oks = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&oks);
    system
        .register_prop(ActorProps::new(move || BoomActor {
            oks: Arc::clone(&counter),
        }))
        .unwrap();

    system.tell::<BoomActor, _>("boom", "ok".to_string()).unwrap();
    system.tell::<BoomActor, _>("boom", "kaboom".to_string()).unwrap();
    system.tell::<BoomActor, _>("boom", "ok".to_string()).unwrap();

    // Both "ok" messages are processed even though the middle one crashed
    // the actor: the mailbox survives the restart.
    assert!(wait_until(2_000, || oks.load(Ordering::SeqCst) == 2).await);

    let actor = ActorRef::of::<BoomActor>("boom");
    let restarts = monitor
        .events_for(&actor)
        .iter()
        .filter(|event| matches!(event, LifecycleEvent::HandlerFailed { .. }))
        .count();
    assert!(restarts >= 1);

    // The actor is still live and accepting messages.
    assert!(system.is_alive(&actor));
    system.tell::<BoomActor, _>("boom", "ok".to_string()).unwrap();
    assert!(wait_until(2_000, || oks.load(Ordering::SeqCst) == 3).await);
}

struct Echo {
    handled: Arc<AtomicUsize>,
}

#[async_trait]
impl Actor for Echo {
    async fn on_msg(&mut self, msg: AnyMessage) -> anyhow::Result<Receive> {
        match msg.downcast::<String>() {
            Ok(_) => {
                self.handled.fetch_add(1, Ordering::SeqCst);
                Ok(Receive::Handled)
            }
            Err(other) => Ok(Receive::Unhandled(other)),
        }
    }
}

#[tokio::test]
async fn poison_pill_stops_one_actor_not_the_system() {
    let system = ActorSystem::new(SystemConfig::default());
    let handled = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&handled);
    system
        .register_prop(ActorProps::new(move || Echo {
            handled: Arc::clone(&counter),
        }))
        .unwrap();

    system.tell::<Echo, _>("a1", "hi".to_string()).unwrap();
    system.tell::<Echo, _>("a2", "hi".to_string()).unwrap();
    system.tell::<Echo, _>("a1", PoisonPill).unwrap();
    system.tell::<Echo, _>("a2", "bye".to_string()).unwrap();

    assert!(wait_until(2_000, || handled.load(Ordering::SeqCst) == 3).await);
    assert!(wait_until(2_000, || system.actor_count() == 1).await);
    assert!(!system.is_alive(&ActorRef::of::<Echo>("a1")));
    assert!(system.is_alive(&ActorRef::of::<Echo>("a2")));

    assert!(system.shutdown_await(Duration::from_secs(1)).await);
    assert_eq!(system.actor_count(), 0);
}

#[tokio::test]
async fn unhandled_message_is_recorded_as_dead_letter() {
    let system = ActorSystem::new(SystemConfig::default());
    let handled = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&handled);
    system
        .register_prop(ActorProps::new(move || Echo {
            handled: Arc::clone(&counter),
        }))
        .unwrap();

    system.tell::<Echo, _>("a", 42_i32).unwrap();

    assert!(wait_until(2_000, || !system.dead_letters(10).unwrap().is_empty()).await);
    let letters = system.dead_letters(10).unwrap();
    assert_eq!(letters.len(), 1);
    assert_eq!(letters[0].recipient.name, "a");
    assert_eq!(letters[0].reason, DeadLetterReason::UnhandledMessage);
    assert_eq!(letters[0].message.downcast_ref::<i32>(), Some(&42));
}

#[derive(Debug)]
struct NoError;

impl std::fmt::Display for NoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "no error")
    }
}

impl std::error::Error for NoError {}

/// Factory tracking how many resources are live and the highest number
/// simultaneously handed out.
struct GaugeFactory {
    live: AtomicUsize,
    peak: AtomicUsize,
}

#[derive(Clone)]
struct GaugeHandle(Arc<GaugeFactory>);

#[async_trait]
impl ResourceFactory for GaugeHandle {
    type Resource = ();
    type Error = NoError;

    async fn acquire(&self) -> Result<(), NoError> {
        let now = self.0.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.0.peak.fetch_max(now, Ordering::SeqCst);
        Ok(())
    }

    fn release(&self, _resource: ()) {
        self.0.live.fetch_sub(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn pool_never_exceeds_its_size_under_contention() {
    let factory = Arc::new(GaugeFactory {
        live: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });
    let pool = ResourcePool::with_size(GaugeHandle(Arc::clone(&factory)), 3).unwrap();

    let tasks: Vec<_> = (0..100)
        .map(|_| {
            let pool = pool.clone();
            tokio::spawn(async move {
                pool.use_resource(|guard| async move {
                    sleep(Duration::from_millis(5)).await;
                    drop(guard);
                })
                .await
                .unwrap();
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }

    assert!(factory.peak.load(Ordering::SeqCst) <= 3);

    pool.shutdown().await;
    assert_eq!(factory.live.load(Ordering::SeqCst), 0);
}

/// A bus subscriber collecting payloads, used by the composition scenario.
struct Sink {
    seen: Arc<Mutex<Vec<u64>>>,
}

#[async_trait]
impl Subscriber<u64> for Sink {
    async fn on_msg(&mut self, msg: EventBusMessage<u64>) -> anyhow::Result<()> {
        self.seen.lock().push(msg.payload);
        Ok(())
    }
}

/// An actor that borrows a pooled "connection" per request and publishes
/// the result on the bus: the three components working together.
struct QueryActor {
    pool: ResourcePool<GaugeHandle>,
    bus: EventBus<u64>,
}

#[async_trait]
impl Actor for QueryActor {
    async fn on_msg(&mut self, msg: AnyMessage) -> anyhow::Result<Receive> {
        match msg.downcast::<u64>() {
            Ok(n) => {
                let result = self
                    .pool
                    .use_resource(|_conn| async move { n * 10 })
                    .await?;
                self.bus.publish_to("results", result).await;
                Ok(Receive::Handled)
            }
            Err(other) => Ok(Receive::Unhandled(other)),
        }
    }
}

#[tokio::test]
async fn actors_pool_and_bus_compose() {
    let factory = Arc::new(GaugeFactory {
        live: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });
    let pool = ResourcePool::with_size(GaugeHandle(Arc::clone(&factory)), 2).unwrap();
    let bus: EventBus<u64> = EventBus::new();

    let seen = Arc::new(Mutex::new(Vec::new()));
    bus.subscribe_filtered(
        Sink {
            seen: Arc::clone(&seen),
        },
        |msg| msg.topic == "results",
    );

    let system = ActorSystem::new(SystemConfig::default());
    let (worker_pool, worker_bus) = (pool.clone(), bus.clone());
    system
        .register_prop(ActorProps::new(move || QueryActor {
            pool: worker_pool.clone(),
            bus: worker_bus.clone(),
        }))
        .unwrap();

    for n in 1..=4_u64 {
        system.tell::<QueryActor, _>("query", n).unwrap();
    }

    assert!(wait_until(2_000, || seen.lock().len() == 4).await);
    assert_eq!(*seen.lock(), vec![10, 20, 30, 40]);

    assert!(system.shutdown_await(Duration::from_secs(1)).await);
    bus.shutdown();
    pool.shutdown().await;
    assert_eq!(factory.live.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn tell_after_shutdown_is_rejected() {
    let system = ActorSystem::new(SystemConfig::default());
    let handled = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&handled);
    system
        .register_prop(ActorProps::new(move || Echo {
            handled: Arc::clone(&counter),
        }))
        .unwrap();

    system.tell::<Echo, _>("a", "hi".to_string()).unwrap();
    assert!(system.shutdown_await(Duration::from_secs(1)).await);

    assert!(matches!(
        system.tell::<Echo, _>("a", "late".to_string()),
        Err(SystemError::ShuttingDown)
    ));
}
