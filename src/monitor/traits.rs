// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::actor::LifecycleEvent;
use crate::util::ActorRef;

/// Observer of actor worker lifecycle events.
///
/// `record` is called from inside worker tasks and from `shutdown_await`;
/// implementations must be cheap and must not block. Background failures are
/// only visible through this hook, dead letters, and logs, so tests lean on
/// it heavily.
pub trait LifecycleMonitor: Send + Sync + 'static {
    /// Record one event for one actor.
    fn record(&self, actor: &ActorRef, event: LifecycleEvent);
}
