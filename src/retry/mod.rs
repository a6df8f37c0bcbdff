//! Bounded retry loop driven by a caller-supplied decision policy.
//!
//! The executor is deliberately ignorant of what errors mean: on every
//! failure it hands the error and an [`AttemptContext`](crate::AttemptContext)
//! to the caller's decision function and acts on the returned
//! [`RetryDecision`]. Attempt ceilings, the elapsed budget, and cancellation
//! are enforced by the loop itself.
//!
//! # Quick Start
//!
//! ```rust
//! use patience::{retry, Backoff, RetryConfig, RetryDecision};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let mut calls = 0u32;
//! let result = retry(
//!     RetryConfig::default(),
//!     || {
//!         calls += 1;
//!         let n = calls;
//!         async move {
//!             if n < 3 {
//!                 Err("flaky")
//!             } else {
//!                 Ok("ok")
//!             }
//!         }
//!     },
//!     |_error, _ctx| RetryDecision::retry(Backoff::constant(Duration::from_millis(1))),
//! )
//! .await;
//!
//! assert_eq!(result.unwrap(), "ok");
//! # });
//! ```
//!
//! # Failure surfacing
//!
//! Exhaustion (counted ceiling, no-count cap, elapsed budget, backoff
//! yielding no delay) and an explicit [`RetryDecision::Stop`] all surface the
//! *last operation error*, untouched, as [`RetryError::Operation`].
//! Cancellation surfaces as [`RetryError::Cancelled`] instead. The library
//! never wraps the error in a synthetic "gave up" type.

mod config;
mod error;
mod run;

pub use config::{always_retry, RetryConfig, RetryDecision};
pub use error::RetryError;
pub use run::{retry, retry_with_cancel};
