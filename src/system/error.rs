//! Actor system error types.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
// (none)

/// Errors surfaced by the public actor-system API.
///
/// Delivery and registration never fail for reasons internal to the
/// runtime; callers only ever see argument violations and the shutdown
/// state. Background failures surface through lifecycle events and dead
/// letters instead.
#[derive(Debug, Error)]
pub enum SystemError {
    /// An empty name or identifier, or a zero limit, was passed to a
    /// public method.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The system is shutting down; no further deliveries are accepted.
    #[error("actor system is shutting down")]
    ShuttingDown,

    /// An actor factory failed to produce an instance.
    ///
    /// Never returned from public methods; rendered into logs and the
    /// `InitFailed` lifecycle event by the worker that hit it.
    #[error("actor instantiation failed: {0}")]
    Instantiation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SystemError::InvalidArgument("name must not be empty".to_string());
        assert!(err.to_string().contains("name must not be empty"));

        assert_eq!(
            SystemError::ShuttingDown.to_string(),
            "actor system is shutting down"
        );

        let err = SystemError::Instantiation("factory panicked".to_string());
        assert!(err.to_string().contains("factory panicked"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SystemError>();
    }
}
