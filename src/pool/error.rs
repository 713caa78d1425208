// Layer 1: Standard library imports
use std::error::Error;

// Layer 2: Third-party crate imports
use thiserror::Error as ThisError;

// Layer 3: Internal module imports
// (none)

/// Resource pool errors, parameterized by the factory's error type.
#[derive(Debug, ThisError)]
pub enum PoolError<E: Error + Send + Sync + 'static> {
    /// The pool has begun shutting down; no further borrows are served.
    #[error("resource pool is shutting down")]
    ShuttingDown,

    /// A pool size of zero was requested.
    #[error("pool size must be greater than zero")]
    InvalidSize,

    /// The factory failed to create a resource.
    #[error("resource factory failed: {0}")]
    Factory(#[source] E),
}
