//! Open-ended polling loop bounded by elapsed budget and backoff exhaustion.
//!
//! [`poll`] is the unbounded sibling of [`retry`](crate::retry::retry): there
//! is no attempt ceiling, only an optional elapsed budget. On every failure
//! the caller's mapping picks a [`Backoff`] for the next wait — or returns
//! `None` to stop and surface the error.
//!
//! # Quick Start
//!
//! ```rust
//! use patience::{poll, Backoff, PollConfig};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let mut calls = 0u32;
//! let result = poll(
//!     PollConfig::default(),
//!     || {
//!         calls += 1;
//!         let n = calls;
//!         async move { if n < 3 { Err("pending") } else { Ok("done") } }
//!     },
//!     |error, _ctx| {
//!         // Keep waiting while the resource is pending; anything else is fatal.
//!         if *error == "pending" {
//!             Some(Backoff::constant(Duration::from_millis(1)))
//!         } else {
//!             None
//!         }
//!     },
//! )
//! .await;
//!
//! assert_eq!(result.unwrap(), "done");
//! # });
//! ```

use std::future::Future;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::backoff::Backoff;
use crate::context::AttemptContext;
use crate::retry::RetryError;
use crate::wait::sleep_through;

#[cfg(test)]
mod tests;

/// Limits for a poll session.
///
/// Both fields are optional; the default config polls until the backoff
/// mapping stops the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollConfig {
    max_elapsed: Option<Duration>,
    tolerance: Option<Duration>,
}

impl PollConfig {
    /// Bound the whole session's wall-clock time.
    pub fn with_max_elapsed(mut self, budget: Duration) -> Self {
        self.max_elapsed = Some(budget);
        self
    }

    /// Sleep-precision hint; advisory, as on
    /// [`RetryConfig::with_tolerance`](crate::RetryConfig::with_tolerance).
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = Some(tolerance);
        self
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

/// Poll `operation` until it succeeds or the backoff mapping stops it.
///
/// The failure-surfacing contract matches [`retry`](crate::retry::retry):
/// a `None` mapping, an exhausted backoff, and a spent elapsed budget all
/// surface the last operation error untouched.
///
/// Sessions started through this entry point are never cancelled externally;
/// use [`poll_with_cancel`] to wire in a token.
pub async fn poll<T, E, Op, Fut, B>(
    config: PollConfig,
    operation: Op,
    backoff: B,
) -> Result<T, RetryError<E>>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    B: FnMut(&E, &AttemptContext) -> Option<Backoff>,
{
    poll_with_cancel(config, &CancellationToken::new(), operation, backoff).await
}

/// [`poll`] with an external cancellation token.
///
/// Cancellation checkpoints match the retry loop: after a failure, before
/// sleeping, and on wake. A running attempt is never interrupted mid-flight.
pub async fn poll_with_cancel<T, E, Op, Fut, B>(
    config: PollConfig,
    cancel: &CancellationToken,
    mut operation: Op,
    mut backoff: B,
) -> Result<T, RetryError<E>>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    B: FnMut(&E, &AttemptContext) -> Option<Backoff>,
{
    let start = Instant::now();
    let mut attempt_index: u32 = 0;

    loop {
        let error = match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        if cancel.is_cancelled() {
            debug!(attempt = attempt_index, "poll session cancelled");
            return Err(RetryError::Cancelled);
        }

        let elapsed = start.elapsed();
        if let Some(budget) = config.max_elapsed() {
            if elapsed >= budget {
                debug!(?elapsed, ?budget, "elapsed budget spent");
                return Err(RetryError::Operation(error));
            }
        }

        // Every poll attempt counts; the context mirrors the attempt index.
        let context = AttemptContext {
            attempt_index,
            counted_attempts: attempt_index,
            elapsed,
        };

        let delay = match backoff(&error, &context)
            .and_then(|strategy| strategy.delay_with(attempt_index, &context, &mut rand::rng()))
        {
            Some(delay) => delay,
            None => {
                debug!(attempt = attempt_index, "backoff mapping stopped polling");
                return Err(RetryError::Operation(error));
            }
        };

        if let Some(budget) = config.max_elapsed() {
            let would_elapse = elapsed.checked_add(delay);
            if would_elapse.map_or(true, |total| total > budget) {
                debug!(?delay, ?budget, "next delay would overrun elapsed budget");
                return Err(RetryError::Operation(error));
            }
        }

        trace!(attempt = attempt_index, ?delay, "sleeping before next poll");
        if !sleep_through(cancel, delay).await {
            debug!(attempt = attempt_index, "poll session cancelled during sleep");
            return Err(RetryError::Cancelled);
        }

        attempt_index += 1;
    }
}
