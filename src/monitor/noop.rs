// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use super::traits::LifecycleMonitor;
use crate::actor::LifecycleEvent;
use crate::util::ActorRef;

/// Monitor that discards every event. The default for production systems.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMonitor;

impl LifecycleMonitor for NoopMonitor {
    fn record(&self, _actor: &ActorRef, _event: LifecycleEvent) {}
}
