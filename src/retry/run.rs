//! The retry loop: run an operation until success or the policy stops it.

use std::future::Future;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::context::AttemptContext;
use crate::retry::config::{RetryConfig, RetryDecision};
use crate::retry::error::RetryError;
use crate::wait::sleep_through;

/// Run `operation` until it succeeds or the decision policy and session
/// limits stop it.
///
/// On every failure the decision function receives the error and a fresh
/// [`AttemptContext`]; a [`RetryDecision::Retry`] is then subject to the
/// no-count cap, the backoff evaluation, the counted ceiling, and the
/// elapsed budget, in that order. Exactly one attempt is in flight at a
/// time.
///
/// Sessions started through this entry point are never cancelled externally;
/// use [`retry_with_cancel`] to wire in a token.
///
/// # Examples
///
/// ```rust
/// use patience::{retry, Backoff, RetryConfig, RetryDecision};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let mut calls = 0u32;
/// let result = retry(
///     RetryConfig::new(3),
///     || {
///         calls += 1;
///         let n = calls;
///         async move { if n < 3 { Err("busy") } else { Ok(n) } }
///     },
///     |_error, _ctx| {
///         RetryDecision::retry(Backoff::exponential(Duration::from_millis(1), 2.0))
///     },
/// )
/// .await;
///
/// assert_eq!(result.unwrap(), 3);
/// # });
/// ```
pub async fn retry<T, E, Op, Fut, D>(
    config: RetryConfig,
    operation: Op,
    decision: D,
) -> Result<T, RetryError<E>>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    D: FnMut(&E, &AttemptContext) -> RetryDecision,
{
    retry_with_cancel(config, &CancellationToken::new(), operation, decision).await
}

/// [`retry`] with an external cancellation token.
///
/// Cancellation is cooperative: the token is observed immediately after a
/// failure, immediately before sleeping, and again on wake, and it pre-empts
/// the decision policy — a cancelled session returns
/// [`RetryError::Cancelled`] without consulting the decision function again.
/// A running attempt is never interrupted mid-flight.
pub async fn retry_with_cancel<T, E, Op, Fut, D>(
    config: RetryConfig,
    cancel: &CancellationToken,
    mut operation: Op,
    mut decision: D,
) -> Result<T, RetryError<E>>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    D: FnMut(&E, &AttemptContext) -> RetryDecision,
{
    let start = Instant::now();
    let mut attempt_index: u32 = 0;
    let mut counted_attempts: u32 = 0;
    let mut no_count_attempts: u32 = 0;

    loop {
        let error = match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        if cancel.is_cancelled() {
            debug!(attempt = attempt_index, "retry session cancelled");
            return Err(RetryError::Cancelled);
        }

        let elapsed = start.elapsed();
        if let Some(budget) = config.max_elapsed() {
            if elapsed >= budget {
                debug!(?elapsed, ?budget, "elapsed budget spent");
                return Err(RetryError::Operation(error));
            }
        }

        let context = AttemptContext {
            attempt_index,
            counted_attempts,
            elapsed,
        };

        let (counted, backoff) = match decision(&error, &context) {
            RetryDecision::Stop => {
                debug!(attempt = attempt_index, "decision policy stopped retrying");
                return Err(RetryError::Operation(error));
            }
            RetryDecision::Retry { counted, backoff } => (counted, backoff),
        };

        if !counted {
            if let Some(cap) = config.max_no_count_attempts() {
                if no_count_attempts >= cap {
                    debug!(cap = cap, "no-count attempt cap reached");
                    return Err(RetryError::Operation(error));
                }
            }
        }

        let delay = match backoff.delay_with(attempt_index, &context, &mut rand::rng()) {
            Some(delay) => delay,
            None => {
                debug!(attempt = attempt_index, "backoff yielded no delay");
                return Err(RetryError::Operation(error));
            }
        };

        if counted {
            if counted_attempts >= config.max_attempts() - 1 {
                debug!(
                    max_attempts = config.max_attempts(),
                    "counted attempt ceiling reached"
                );
                return Err(RetryError::Operation(error));
            }
            counted_attempts += 1;
        } else {
            no_count_attempts += 1;
        }

        if let Some(budget) = config.max_elapsed() {
            let would_elapse = elapsed.checked_add(delay);
            if would_elapse.map_or(true, |total| total > budget) {
                debug!(?delay, ?budget, "next delay would overrun elapsed budget");
                return Err(RetryError::Operation(error));
            }
        }

        trace!(
            attempt = attempt_index,
            ?delay,
            counted = counted,
            "sleeping before retry"
        );
        if !sleep_through(cancel, delay).await {
            debug!(attempt = attempt_index, "retry session cancelled during sleep");
            return Err(RetryError::Cancelled);
        }

        attempt_index += 1;
    }
}
