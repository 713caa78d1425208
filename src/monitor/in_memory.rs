// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use parking_lot::Mutex;

// Layer 3: Internal module imports
use super::traits::LifecycleMonitor;
use crate::actor::LifecycleEvent;
use crate::util::ActorRef;

/// Monitor that records events in memory, in arrival order.
///
/// Intended for tests: share it with the system via `Arc`, drive the
/// scenario, then assert on [`snapshot`](Self::snapshot) or the counting
/// helpers.
///
/// # Example
///
/// ```rust,ignore
/// let monitor = Arc::new(InMemoryMonitor::new());
/// let system = ActorSystem::with_monitor(SystemConfig::default(), monitor.clone());
/// // ... drive actors ...
/// assert_eq!(monitor.count_for(&actor_ref), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryMonitor {
    events: Mutex<Vec<(ActorRef, LifecycleEvent)>>,
}

impl InMemoryMonitor {
    /// Create an empty monitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, oldest first.
    pub fn snapshot(&self) -> Vec<(ActorRef, LifecycleEvent)> {
        self.events.lock().clone()
    }

    /// Events recorded for one actor, oldest first.
    pub fn events_for(&self, actor: &ActorRef) -> Vec<LifecycleEvent> {
        self.events
            .lock()
            .iter()
            .filter(|(recorded, _)| recorded == actor)
            .map(|(_, event)| event.clone())
            .collect()
    }

    /// Number of events recorded for one actor.
    pub fn count_for(&self, actor: &ActorRef) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|(recorded, _)| recorded == actor)
            .count()
    }

    /// Total number of recorded events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl LifecycleMonitor for InMemoryMonitor {
    fn record(&self, actor: &ActorRef, event: LifecycleEvent) {
        self.events.lock().push((actor.clone(), event));
    }
}
