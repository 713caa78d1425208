//! Actor factories.

// Layer 1: Standard library imports
use std::any::type_name;
use std::fmt;
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use super::traits::Actor;

/// A factory for actor instances of type `A`.
///
/// Props are registered once with the
/// [`ActorSystem`](crate::system::ActorSystem) and invoked by the runtime
/// whenever a worker needs a fresh instance: on first delivery to a new
/// actor name, and again after every restart. The factory must therefore
/// produce an actor in its initial state each time it is called.
///
/// The identifier defaults to the fully qualified type name of `A`, which
/// is also what [`tell`](crate::system::ActorSystem::tell) derives from its
/// type parameter. Overriding it is possible for embedders that route by
/// hand via [`tell_ref`](crate::system::ActorSystem::tell_ref).
///
/// # Example
///
/// ```rust,ignore
/// let props = ActorProps::new(|| Counter { count: 0 });
/// system.register_prop(props)?;
/// ```
pub struct ActorProps<A> {
    identifier: String,
    create: Arc<dyn Fn() -> A + Send + Sync>,
}

impl<A: Actor> ActorProps<A> {
    /// Create props with the default identifier (the type name of `A`).
    pub fn new(create: impl Fn() -> A + Send + Sync + 'static) -> Self {
        Self {
            identifier: type_name::<A>().to_string(),
            create: Arc::new(create),
        }
    }

    /// Override the prop identifier.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// The identifier these props are registered under.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Split into identifier and factory closure.
    pub(crate) fn into_parts(self) -> (String, Arc<dyn Fn() -> A + Send + Sync>) {
        (self.identifier, self.create)
    }
}

impl<A> fmt::Debug for ActorProps<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorProps")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}
