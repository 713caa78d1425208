//! Lifecycle observation for actor workers.
//!
//! The runtime reports every [`LifecycleEvent`](crate::actor::LifecycleEvent)
//! to a [`LifecycleMonitor`]. Production systems typically keep the default
//! [`NoopMonitor`] and rely on the `tracing` output; tests install an
//! [`InMemoryMonitor`] and assert on the recorded events.

pub mod in_memory;
pub mod noop;
pub mod traits;

pub use in_memory::InMemoryMonitor;
pub use noop::NoopMonitor;
pub use traits::LifecycleMonitor;
