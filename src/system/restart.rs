//! Sliding-window restart accounting with exponential backoff.

// Layer 1: Standard library imports
use std::collections::VecDeque;
use std::time::Duration;

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};

// Layer 3: Internal module imports
use super::config::RestartLimit;

/// Per-worker restart budget.
///
/// Tracks restart timestamps in a sliding window. Old entries expire, so a
/// burst of failures followed by quiet operation does not permanently
/// exhaust the budget. Without a configured limit every restart is allowed
/// with no delay.
#[derive(Debug)]
pub(crate) struct RestartBudget {
    limit: Option<RestartLimit>,
    history: VecDeque<DateTime<Utc>>,
}

impl RestartBudget {
    pub(crate) fn new(limit: Option<RestartLimit>) -> Self {
        Self {
            limit,
            history: VecDeque::new(),
        }
    }

    /// Account for one restart attempt.
    ///
    /// Returns the backoff delay to wait before restarting, or `None` when
    /// the budget is exhausted and the actor must terminate.
    pub(crate) fn next_restart(&mut self) -> Option<Duration> {
        let Some(limit) = &self.limit else {
            return Some(Duration::ZERO);
        };

        let now = Utc::now();
        let window = chrono::Duration::from_std(limit.window).unwrap_or(chrono::Duration::MAX);
        while let Some(oldest) = self.history.front() {
            if now.signed_duration_since(*oldest) > window {
                self.history.pop_front();
            } else {
                break;
            }
        }

        if self.history.len() as u32 >= limit.max_restarts {
            return None;
        }

        // Exponent capped at 10 to keep the shift well inside u32 range.
        let exponent = (self.history.len() as u32).min(10);
        let delay = limit
            .base_delay
            .saturating_mul(1_u32 << exponent)
            .min(limit.max_delay);

        self.history.push_back(now);
        Some(delay)
    }
}
