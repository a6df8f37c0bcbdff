//! Attempt context passed to decision callbacks and backoff transforms.

use std::time::Duration;

/// Immutable snapshot of where a retry or poll session currently stands.
///
/// A fresh context is built for every failed attempt and handed to the
/// caller's decision callback and to each [`BackoffTransform`] in the chain.
/// It is never mutated after construction, so callbacks can hold on to it
/// freely.
///
/// [`BackoffTransform`]: crate::BackoffTransform
///
/// # Examples
///
/// ```rust
/// use patience::AttemptContext;
/// use std::time::Duration;
///
/// let ctx = AttemptContext::new(0);
/// assert_eq!(ctx.attempt_index, 0);
/// assert_eq!(ctx.counted_attempts, 0);
/// assert_eq!(ctx.elapsed, Duration::ZERO);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptContext {
    /// Zero-based index of the attempt that just failed.
    pub attempt_index: u32,
    /// How many retries so far consumed the counted-attempt budget.
    pub counted_attempts: u32,
    /// Wall-clock time since the session started.
    pub elapsed: Duration,
}

impl AttemptContext {
    /// Create a context for the given attempt with zero counters.
    ///
    /// The executors build their contexts from live session counters; this
    /// constructor is for standalone backoff evaluation.
    pub fn new(attempt_index: u32) -> Self {
        Self {
            attempt_index,
            counted_attempts: 0,
            elapsed: Duration::ZERO,
        }
    }
}
