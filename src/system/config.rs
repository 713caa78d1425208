//! System configuration with sensible defaults.

// Layer 1: Standard library
use std::time::Duration;

// Layer 2: Third-party
use serde::{Deserialize, Serialize};

// Layer 3: Internal
use super::error::SystemError;

/// Default capacity of the dead-letter queue
pub const DEFAULT_DEAD_LETTER_CAPACITY: usize = 10_000;

/// Default timeout for graceful system shutdown (30 seconds)
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Default base delay between restarts of a crashing actor (100 ms)
pub const DEFAULT_RESTART_BASE_DELAY: Duration = Duration::from_millis(100);

/// Default cap on the exponential restart delay (60 seconds)
pub const DEFAULT_RESTART_MAX_DELAY: Duration = Duration::from_secs(60);

/// Sliding-window restart budget for crashing actors.
///
/// When installed via [`SystemConfigBuilder::with_restart_limit`], an actor
/// whose handler keeps failing is restarted at most `max_restarts` times
/// within `window`; the next failure terminates it like a failed
/// initialization. Each restart waits an exponential backoff delay
/// (`base_delay * 2^n`, capped at `max_delay`). Restarts outside the window
/// expire and no longer count, so a transient burst of failures does not
/// permanently condemn an actor.
///
/// # Example
///
/// ```rust
/// use keanu::system::RestartLimit;
/// use std::time::Duration;
///
/// // Allow 5 restarts per minute.
/// let limit = RestartLimit::new(5, Duration::from_secs(60));
/// assert_eq!(limit.max_restarts, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestartLimit {
    /// Maximum restarts allowed within the window
    pub max_restarts: u32,

    /// Sliding time window for counting restarts
    pub window: Duration,

    /// Initial backoff delay, doubled per consecutive restart
    pub base_delay: Duration,

    /// Upper bound on the backoff delay
    pub max_delay: Duration,
}

impl RestartLimit {
    /// Create a limit with the default backoff delays.
    pub fn new(max_restarts: u32, window: Duration) -> Self {
        Self {
            max_restarts,
            window,
            base_delay: DEFAULT_RESTART_BASE_DELAY,
            max_delay: DEFAULT_RESTART_MAX_DELAY,
        }
    }

    /// Create a limit with custom backoff delays.
    pub fn with_delays(
        max_restarts: u32,
        window: Duration,
        base_delay: Duration,
        max_delay: Duration,
    ) -> Self {
        Self {
            max_restarts,
            window,
            base_delay,
            max_delay,
        }
    }
}

/// System-wide configuration for the actor runtime.
///
/// # Examples
///
/// ```rust
/// use keanu::system::{SystemConfig, DEFAULT_DEAD_LETTER_CAPACITY};
///
/// let config = SystemConfig::default();
/// assert_eq!(config.dead_letter_capacity, DEFAULT_DEAD_LETTER_CAPACITY);
/// assert!(config.restart_limit.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Capacity of the bounded dead-letter queue
    pub dead_letter_capacity: usize,

    /// Timeout used by [`shutdown`](super::ActorSystem::shutdown)
    pub shutdown_timeout: Duration,

    /// Restart budget for crashing actors. `None` restarts without bound.
    pub restart_limit: Option<RestartLimit>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            dead_letter_capacity: DEFAULT_DEAD_LETTER_CAPACITY,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            restart_limit: None,
        }
    }
}

impl SystemConfig {
    /// Create a configuration builder.
    pub fn builder() -> SystemConfigBuilder {
        SystemConfigBuilder::default()
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::InvalidArgument`] naming the offending field.
    pub fn validate(&self) -> Result<(), SystemError> {
        if self.dead_letter_capacity == 0 {
            return Err(SystemError::InvalidArgument(
                "dead_letter_capacity must be > 0".to_string(),
            ));
        }
        if self.shutdown_timeout.is_zero() {
            return Err(SystemError::InvalidArgument(
                "shutdown_timeout must be > 0".to_string(),
            ));
        }
        if let Some(limit) = &self.restart_limit {
            if limit.window.is_zero() {
                return Err(SystemError::InvalidArgument(
                    "restart_limit.window must be > 0".to_string(),
                ));
            }
            if limit.max_delay < limit.base_delay {
                return Err(SystemError::InvalidArgument(
                    "restart_limit.max_delay must be >= base_delay".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Builder for [`SystemConfig`] with a fluent API.
#[derive(Debug, Default)]
pub struct SystemConfigBuilder {
    config: SystemConfig,
}

impl SystemConfigBuilder {
    /// Set the dead-letter queue capacity.
    pub fn with_dead_letter_capacity(mut self, capacity: usize) -> Self {
        self.config.dead_letter_capacity = capacity;
        self
    }

    /// Set the default graceful-shutdown timeout.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config.shutdown_timeout = timeout;
        self
    }

    /// Install a restart budget for crashing actors.
    pub fn with_restart_limit(mut self, limit: RestartLimit) -> Self {
        self.config.restart_limit = Some(limit);
        self
    }

    /// Validate and produce the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::InvalidArgument`] when a value is out of range.
    pub fn build(self) -> Result<SystemConfig, SystemError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
