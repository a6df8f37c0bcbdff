//! Retry session limits and the per-failure decision type.

use std::time::Duration;

use crate::backoff::Backoff;
use crate::context::AttemptContext;

/// Limits for a retry session.
///
/// Limits are validated at construction; invalid values are programmer
/// errors and panic immediately rather than surfacing as runtime retry
/// failures.
///
/// # Examples
///
/// ```rust
/// use patience::RetryConfig;
/// use std::time::Duration;
///
/// let config = RetryConfig::new(5)
///     .with_max_no_count_attempts(10)
///     .with_max_elapsed(Duration::from_secs(60));
///
/// assert_eq!(config.max_attempts(), 5);
/// assert_eq!(config.max_no_count_attempts(), Some(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    max_attempts: u32,
    max_no_count_attempts: Option<u32>,
    max_elapsed: Option<Duration>,
    tolerance: Option<Duration>,
}

impl RetryConfig {
    /// Create a config with the given counted-attempt ceiling.
    ///
    /// The ceiling includes the initial attempt: `new(3)` allows the initial
    /// attempt plus at most two counted retries. Uncounted retries and the
    /// elapsed budget are unlimited until configured.
    ///
    /// # Panics
    ///
    /// Panics if `max_attempts` is zero.
    pub fn new(max_attempts: u32) -> Self {
        assert!(max_attempts > 0, "max_attempts must be > 0");
        Self {
            max_attempts,
            max_no_count_attempts: None,
            max_elapsed: None,
            tolerance: None,
        }
    }

    /// Cap retries that do not consume the counted-attempt budget.
    pub fn with_max_no_count_attempts(mut self, cap: u32) -> Self {
        self.max_no_count_attempts = Some(cap);
        self
    }

    /// Bound the whole session's wall-clock time.
    ///
    /// The budget is enforced both when a failure is observed and before
    /// sleeping: a sleep that would overrun the budget is skipped and the
    /// session stops with the last operation error.
    pub fn with_max_elapsed(mut self, budget: Duration) -> Self {
        self.max_elapsed = Some(budget);
        self
    }

    /// Sleep-precision hint.
    ///
    /// Advisory: carried for callers that tune timer coalescing; the tokio
    /// timer has no such knob, so this does not change the sleep today.
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// The counted-attempt ceiling (initial attempt included).
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// The uncounted-retry cap, if configured.
    pub fn max_no_count_attempts(&self) -> Option<u32> {
        self.max_no_count_attempts
    }

    /// The elapsed budget, if configured.
    pub fn max_elapsed(&self) -> Option<Duration> {
        self.max_elapsed
    }

    /// The sleep-precision hint, if configured.
    pub fn tolerance(&self) -> Option<Duration> {
        self.tolerance
    }
}

impl Default for RetryConfig {
    /// Three counted attempts, no other limits.
    fn default() -> Self {
        Self::new(3)
    }
}

/// Per-failure verdict produced by the caller's decision function.
#[derive(Debug, Clone)]
pub enum RetryDecision {
    /// Retry after evaluating `backoff` at the current attempt index.
    Retry {
        /// Whether this retry consumes the counted-attempt budget.
        counted: bool,
        /// The backoff to evaluate for the inter-attempt delay.
        backoff: Backoff,
    },
    /// Stop immediately and surface the error.
    Stop,
}

impl RetryDecision {
    /// A counted retry with the given backoff.
    pub fn retry(backoff: Backoff) -> Self {
        Self::Retry {
            counted: true,
            backoff,
        }
    }

    /// A retry that does not consume the counted-attempt budget.
    ///
    /// Uncounted retries are bounded separately by
    /// [`RetryConfig::with_max_no_count_attempts`].
    pub fn retry_uncounted(backoff: Backoff) -> Self {
        Self::Retry {
            counted: false,
            backoff,
        }
    }
}

/// The default decision policy: retry unconditionally, counted, with zero
/// backoff.
///
/// # Examples
///
/// ```rust
/// use patience::{always_retry, retry, RetryConfig};
///
/// # tokio_test::block_on(async {
/// let mut calls = 0u32;
/// let result = retry(
///     RetryConfig::new(2),
///     || {
///         calls += 1;
///         async move { Err::<(), _>("down") }
///     },
///     always_retry,
/// )
/// .await;
///
/// assert!(result.is_err());
/// assert_eq!(calls, 2);
/// # });
/// ```
pub fn always_retry<E>(_error: &E, _context: &AttemptContext) -> RetryDecision {
    RetryDecision::retry(Backoff::none())
}
