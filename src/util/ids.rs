// Layer 1: Standard library imports
use std::any::type_name;
use std::fmt::{self, Display};

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Layer 3: Internal module imports
// (none)

/// Logical identity of an actor: a name paired with the prop id of its kind.
///
/// An `ActorRef` is a weak, lookup-only key. It carries no handle to the
/// worker task; dropping one never stops an actor. The prop id is the fully
/// qualified type name of the actor type, so two actors of different kinds
/// can share a name without colliding.
///
/// # Identifier form
///
/// A ref serializes to `"name:prop_id"`. Parsing splits on the *first* `:`,
/// so the round trip holds for every name that contains no `:` (prop ids
/// routinely contain `::` and survive unchanged).
///
/// # Example
///
/// ```rust
/// use keanu::util::ActorRef;
///
/// let r = ActorRef::new("billing", "app::actors::Invoicer");
/// assert_eq!(r.to_identifier(), "billing:app::actors::Invoicer");
/// assert_eq!(ActorRef::from_identifier(&r.to_identifier()), Some(r));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorRef {
    /// Actor name, unique per prop id
    pub name: String,
    /// Fully qualified kind name of the actor type
    pub prop_id: String,
}

impl ActorRef {
    /// Create a ref from explicit parts.
    pub fn new(name: impl Into<String>, prop_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prop_id: prop_id.into(),
        }
    }

    /// Create a ref for the actor type `A` under the given name.
    pub fn of<A: 'static>(name: impl Into<String>) -> Self {
        Self::new(name, type_name::<A>())
    }

    /// Serialize to the `"name:prop_id"` identifier form.
    pub fn to_identifier(&self) -> String {
        format!("{}:{}", self.name, self.prop_id)
    }

    /// Parse an identifier produced by [`to_identifier`](Self::to_identifier).
    ///
    /// Returns `None` when either part is empty or the separator is missing.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        let (name, prop_id) = identifier.split_once(':')?;
        if name.is_empty() || prop_id.is_empty() {
            return None;
        }
        Some(Self::new(name, prop_id))
    }
}

impl Display for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.prop_id)
    }
}

/// Unique identifier for an event-bus subscription.
///
/// Backed by a UUID v4; cheap to copy and safe to hand across tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Generate a new random subscription id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a subscription id from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
