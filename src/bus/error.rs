// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::mailbox::MailboxError;

/// A per-subscription delivery failure.
///
/// Publishing never fails as a whole: each failure is reported to the bus's
/// error hook together with the message and the subscription id, and the
/// fan-out continues with the remaining subscriptions.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The subscription's filter panicked while inspecting the message.
    #[error("subscription filter panicked")]
    FilterPanicked,

    /// Inserting into the subscriber's mailbox failed.
    #[error("delivery to subscriber mailbox failed: {0}")]
    Delivery(#[from] MailboxError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PublishError::FilterPanicked.to_string(),
            "subscription filter panicked"
        );
        let err = PublishError::from(MailboxError::Closed);
        assert!(err.to_string().contains("mailbox is closed"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PublishError>();
    }
}
