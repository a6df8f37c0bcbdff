//! Composable backoff curves.
//!
//! A [`Backoff`] is pure data: one baseline curve mapping a 0-based attempt
//! index to a delay, plus an ordered chain of transforms that adjust it.
//! Policies describe *what* delays look like; the [`retry()`](crate::retry())
//! and [`poll()`](crate::poll()) executors decide *when* to apply them.
//!
//! # Quick Start
//!
//! ```rust
//! use patience::Backoff;
//! use std::time::Duration;
//!
//! // Exponential growth, capped at 30s, with 15% jitter.
//! let backoff = Backoff::exponential(Duration::from_secs(1), 2.0)
//!     .max(Duration::from_secs(30))
//!     .jitter(0.15);
//!
//! let delay = backoff.delay(3).unwrap();
//! assert!(delay >= Duration::from_secs_f64(8.0 * 0.85));
//! assert!(delay <= Duration::from_secs_f64(8.0 * 1.15));
//! ```
//!
//! # Transform ordering
//!
//! Transforms run in chain order with no implicit re-application. Jitter
//! chained *after* a cap can push the result back above the cap:
//!
//! ```rust
//! use patience::Backoff;
//! use std::time::Duration;
//!
//! // The jittered delay may exceed 5s because the cap ran first.
//! let backoff = Backoff::constant(Duration::from_secs(10))
//!     .max(Duration::from_secs(5))
//!     .jitter(0.5);
//! # let _ = backoff.delay(0);
//! ```
//!
//! Chain the cap last if the bound must hold.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rand::RngCore;

use crate::context::AttemptContext;

mod scale;
mod transform;

pub use transform::BackoffTransform;

use transform::{Clamp, FullJitter, PercentJitter};


/// Immutable backoff plan: a baseline curve plus ordered transforms.
///
/// Every chaining method returns a *new* `Backoff`; a constructed value is
/// never mutated, so it can be cloned cheaply (the internals are
/// `Arc`-backed) and shared across any number of concurrent sessions.
///
/// # Examples
///
/// ```rust
/// use patience::Backoff;
/// use std::time::Duration;
///
/// let base = Backoff::constant(Duration::from_secs(10));
/// let capped = base.clone().max(Duration::from_secs(5));
///
/// // Chaining never touches the original.
/// assert_eq!(base.delay(0), Some(Duration::from_secs(10)));
/// assert_eq!(capped.delay(0), Some(Duration::from_secs(5)));
/// ```
#[derive(Clone)]
pub struct Backoff {
    base: Arc<dyn Fn(u32) -> Duration + Send + Sync>,
    transforms: Vec<Arc<dyn BackoffTransform>>,
}

impl fmt::Debug for Backoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backoff")
            .field("transforms", &self.transforms.len())
            .finish_non_exhaustive()
    }
}

impl Backoff {
    /// A backoff that always yields zero delay.
    ///
    /// This is the implicit policy of [`always_retry`](crate::always_retry):
    /// retry immediately, bounded only by the session's attempt and elapsed
    /// limits.
    pub fn none() -> Self {
        Self::custom(|_| Duration::ZERO)
    }

    /// A fixed delay for every attempt.
    pub fn constant(delay: Duration) -> Self {
        Self::custom(move |_| delay)
    }

    /// Linear growth: `offset + step * attempt` (saturating).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patience::Backoff;
    /// use std::time::Duration;
    ///
    /// let backoff = Backoff::linear(Duration::from_secs(1), Duration::from_secs(2));
    /// assert_eq!(backoff.delay(0), Some(Duration::from_secs(2)));
    /// assert_eq!(backoff.delay(1), Some(Duration::from_secs(3)));
    /// assert_eq!(backoff.delay(2), Some(Duration::from_secs(4)));
    /// ```
    pub fn linear(step: Duration, offset: Duration) -> Self {
        Self::custom(move |attempt| offset.saturating_add(step.saturating_mul(attempt)))
    }

    /// Exponential growth: `initial * multiplier^attempt`.
    ///
    /// Overflowing delays saturate at `Duration::MAX`; chain
    /// [`max`](Backoff::max) to keep them bounded.
    ///
    /// # Panics
    ///
    /// Panics if `multiplier` is not finite or not positive. Invalid curve
    /// parameters are programmer errors and rejected at construction rather
    /// than surfacing mid-session.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patience::Backoff;
    /// use std::time::Duration;
    ///
    /// let backoff = Backoff::exponential(Duration::from_millis(500), 2.0);
    /// assert_eq!(backoff.delay(0), Some(Duration::from_millis(500)));
    /// assert_eq!(backoff.delay(1), Some(Duration::from_millis(1000)));
    /// assert_eq!(backoff.delay(2), Some(Duration::from_millis(2000)));
    /// ```
    pub fn exponential(initial: Duration, multiplier: f64) -> Self {
        assert!(
            multiplier.is_finite() && multiplier > 0.0,
            "multiplier must be positive and finite"
        );
        Self::custom(move |attempt| {
            let exp = attempt.min(i32::MAX as u32) as i32;
            scale::scale_saturating(initial, multiplier.powi(exp))
        })
    }

    /// A caller-supplied baseline curve. No validation is applied.
    pub fn custom(f: impl Fn(u32) -> Duration + Send + Sync + 'static) -> Self {
        Self {
            base: Arc::new(f),
            transforms: Vec::new(),
        }
    }

    /// Raise delays below `floor` up to it.
    pub fn min(self, floor: Duration) -> Self {
        self.with_transform(Clamp {
            min: Some(floor),
            max: None,
        })
    }

    /// Cap delays above `ceiling` down to it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patience::Backoff;
    /// use std::time::Duration;
    ///
    /// let backoff = Backoff::exponential(Duration::from_secs(1), 2.0)
    ///     .max(Duration::from_secs(3));
    ///
    /// // Growth, then flat.
    /// assert_eq!(backoff.delay(0), Some(Duration::from_secs(1)));
    /// assert_eq!(backoff.delay(1), Some(Duration::from_secs(2)));
    /// assert_eq!(backoff.delay(2), Some(Duration::from_secs(3)));
    /// assert_eq!(backoff.delay(3), Some(Duration::from_secs(3)));
    /// ```
    pub fn max(self, ceiling: Duration) -> Self {
        self.with_transform(Clamp {
            min: None,
            max: Some(ceiling),
        })
    }

    /// Clamp delays into the given optional bounds.
    pub fn clamp(self, min: Option<Duration>, max: Option<Duration>) -> Self {
        self.with_transform(Clamp { min, max })
    }

    /// Scale delays by a uniform random factor in `[max(0, 1 - p), 1 + p]`.
    ///
    /// `0.15` is the conventional value for spreading out synchronized
    /// clients without distorting the curve much.
    ///
    /// # Panics
    ///
    /// Panics if `percent` is negative or not finite.
    pub fn jitter(self, percent: f64) -> Self {
        self.with_transform(PercentJitter::new(percent))
    }

    /// Scale delays by a uniform random factor in `[0, 1]` (AWS-style full
    /// jitter), spreading attempts across the whole `[0, delay]` range.
    pub fn full_jitter(self) -> Self {
        self.with_transform(FullJitter)
    }

    /// Append a custom transform to the chain.
    ///
    /// Transforms run in chain order; a transform returning `None` aborts
    /// the evaluation, which the executors treat as policy exhaustion.
    pub fn with_transform(mut self, transform: impl BackoffTransform + 'static) -> Self {
        self.transforms.push(Arc::new(transform));
        self
    }

    /// Compute the delay for an attempt with an injected RNG.
    ///
    /// Runs the baseline, then folds the transforms in chain order. The
    /// first transform to return `None` aborts the evaluation and the whole
    /// result is `None` — no later transform runs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use patience::{AttemptContext, Backoff};
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use std::time::Duration;
    ///
    /// let backoff = Backoff::constant(Duration::from_secs(10)).jitter(0.1);
    /// let mut rng = StdRng::seed_from_u64(7);
    ///
    /// let delay = backoff
    ///     .delay_with(0, &AttemptContext::new(0), &mut rng)
    ///     .unwrap();
    /// assert!(delay >= Duration::from_secs(9));
    /// assert!(delay <= Duration::from_secs(11));
    /// ```
    pub fn delay_with(
        &self,
        attempt: u32,
        context: &AttemptContext,
        rng: &mut dyn RngCore,
    ) -> Option<Duration> {
        let mut value = (self.base)(attempt);
        for transform in &self.transforms {
            value = transform.apply(value, attempt, context, rng)?;
        }
        Some(value)
    }

    /// Compute the delay for an attempt with the process RNG.
    ///
    /// Convenience for callers that do not need determinism; equivalent to
    /// [`delay_with`](Backoff::delay_with) with a fresh context and
    /// [`rand::rng`].
    pub fn delay(&self, attempt: u32) -> Option<Duration> {
        self.delay_with(attempt, &AttemptContext::new(attempt), &mut rand::rng())
    }
}
