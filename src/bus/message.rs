// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
// (none)

/// A published event: an opaque topic tag and a payload.
///
/// The topic is what filters usually inspect; the empty string means "no
/// topic". Fan-out clones the message once per matching subscriber, so
/// payloads must be `Clone`.
///
/// # Example
///
/// ```rust
/// use keanu::bus::EventBusMessage;
///
/// let msg = EventBusMessage::new("orders", 17_u32);
/// assert_eq!(msg.topic, "orders");
///
/// let untagged = EventBusMessage::untopiced(17_u32);
/// assert_eq!(untagged.topic, "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBusMessage<T> {
    /// Opaque topic tag; empty means no topic
    pub topic: String,
    /// The event payload
    pub payload: T,
}

impl<T> EventBusMessage<T> {
    /// Create a message under a topic.
    pub fn new(topic: impl Into<String>, payload: T) -> Self {
        Self {
            topic: topic.into(),
            payload,
        }
    }

    /// Create a message with no topic (the empty string).
    pub fn untopiced(payload: T) -> Self {
        Self {
            topic: String::new(),
            payload,
        }
    }
}
