//! # Patience
//!
//! > *"Patience is bitter, but its fruit is sweet"*
//!
//! Composable backoff curves and retry/poll loops for async Rust.
//!
//! ## Philosophy
//!
//! **Patience** keeps policy and execution apart:
//! - A [`Backoff`] is pure data — one baseline curve plus an ordered chain
//!   of transforms. It never sleeps, never classifies errors, and can be
//!   built once and shared across any number of concurrent sessions.
//! - The [`retry()`] and [`poll()`] executors do the waiting. They know
//!   nothing about what errors mean; the caller's decision callback does.
//!
//! ## Quick Example
//!
//! ```rust
//! use patience::{retry, Backoff, RetryConfig, RetryDecision};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! // Exponential backoff, capped at 10s, with 15% jitter.
//! let backoff = Backoff::exponential(Duration::from_millis(100), 2.0)
//!     .max(Duration::from_secs(10))
//!     .jitter(0.15);
//!
//! let mut calls = 0u32;
//! let result = retry(
//!     RetryConfig::new(5).with_max_elapsed(Duration::from_secs(30)),
//!     || {
//!         calls += 1;
//!         let n = calls;
//!         async move { if n < 2 { Err("connection reset") } else { Ok("response") } }
//!     },
//!     |_error, _ctx| RetryDecision::retry(backoff.clone()),
//! )
//! .await;
//!
//! assert_eq!(result.unwrap(), "response");
//! # });
//! ```
//!
//! The crate performs no I/O of its own and holds no global state; the only
//! things it drives are the caller's operation, the tokio timer, and an
//! optional [`CancellationToken`](tokio_util::sync::CancellationToken).

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod backoff;
pub mod context;
pub mod poll;
pub mod retry;

mod wait;

// Re-exports
pub use backoff::{Backoff, BackoffTransform};
pub use context::AttemptContext;
pub use poll::{poll, poll_with_cancel, PollConfig};
pub use retry::{always_retry, retry, retry_with_cancel, RetryConfig, RetryDecision, RetryError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::backoff::{Backoff, BackoffTransform};
    pub use crate::context::AttemptContext;
    pub use crate::poll::{poll, poll_with_cancel, PollConfig};
    pub use crate::retry::{
        always_retry, retry, retry_with_cancel, RetryConfig, RetryDecision, RetryError,
    };
}
