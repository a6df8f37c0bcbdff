//! Transforms that adjust a baseline delay after it has been computed.
//!
//! Transforms run strictly in the order they were chained onto a
//! [`Backoff`](crate::Backoff). A transform returning `None` aborts the whole
//! evaluation; the shipped set (clamp, percent jitter, full jitter) only does
//! so when scaling degenerates (overflow, non-finite factor), but custom
//! transforms may veto deliberately.

use std::time::Duration;

use rand::{Rng, RngCore};

use crate::backoff::scale::scale_duration;
use crate::context::AttemptContext;

/// A chainable adjustment applied to a baseline delay.
///
/// Implementations must be pure apart from draws taken from the supplied
/// RNG. Returning `None` stops the chain immediately and makes the whole
/// evaluation yield no delay, which the executors treat as policy
/// exhaustion.
///
/// The RNG is passed as `&mut dyn RngCore` so tests can inject a seeded
/// generator (for example `StdRng::seed_from_u64`) while production code
/// uses the process default.
pub trait BackoffTransform: Send + Sync {
    /// Adjust `delay` for the given attempt, or veto the attempt entirely.
    fn apply(
        &self,
        delay: Duration,
        attempt: u32,
        context: &AttemptContext,
        rng: &mut dyn RngCore,
    ) -> Option<Duration>;
}

/// Clamp the delay into optional `[min, max]` bounds.
///
/// Values below `min` are raised, values above `max` are capped. Never
/// returns `None`.
pub(crate) struct Clamp {
    pub(crate) min: Option<Duration>,
    pub(crate) max: Option<Duration>,
}

impl BackoffTransform for Clamp {
    fn apply(
        &self,
        delay: Duration,
        _attempt: u32,
        _context: &AttemptContext,
        _rng: &mut dyn RngCore,
    ) -> Option<Duration> {
        let mut value = delay;
        if let Some(floor) = self.min {
            if value < floor {
                value = floor;
            }
        }
        if let Some(ceiling) = self.max {
            if value > ceiling {
                value = ceiling;
            }
        }
        Some(value)
    }
}

/// Symmetric percentage jitter: scale by a uniform factor in
/// `[max(0, 1 - p), 1 + p]`.
pub(crate) struct PercentJitter {
    percent: f64,
}

impl PercentJitter {
    /// # Panics
    ///
    /// Panics if `percent` is negative or not finite.
    pub(crate) fn new(percent: f64) -> Self {
        assert!(
            percent.is_finite() && percent >= 0.0,
            "jitter percent must be non-negative and finite"
        );
        Self { percent }
    }
}

impl BackoffTransform for PercentJitter {
    fn apply(
        &self,
        delay: Duration,
        _attempt: u32,
        _context: &AttemptContext,
        rng: &mut dyn RngCore,
    ) -> Option<Duration> {
        let low = (1.0 - self.percent).max(0.0);
        let high = 1.0 + self.percent;
        let factor = rng.random_range(low..=high);
        scale_duration(delay, factor)
    }
}

/// AWS-style full jitter: scale by a uniform factor in `[0, 1]`, spreading
/// attempts across the whole range up to the baseline delay.
pub(crate) struct FullJitter;

impl BackoffTransform for FullJitter {
    fn apply(
        &self,
        delay: Duration,
        _attempt: u32,
        _context: &AttemptContext,
        rng: &mut dyn RngCore,
    ) -> Option<Duration> {
        let factor = rng.random_range(0.0..=1.0);
        scale_duration(delay, factor)
    }
}
