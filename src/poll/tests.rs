//! Integration tests for the poll executor.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollError {
    Pending,
    Fatal,
}

fn counter() -> Arc<AtomicU32> {
    Arc::new(AtomicU32::new(0))
}

#[tokio::test]
async fn succeeds_after_pending_attempts() {
    let attempts = counter();
    let result = poll(
        PollConfig::default(),
        {
            let attempts = attempts.clone();
            move || {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(PollError::Pending)
                    } else {
                        Ok("done")
                    }
                }
            }
        },
        |error, _ctx| match error {
            PollError::Pending => Some(Backoff::none()),
            PollError::Fatal => None,
        },
    )
    .await;

    assert_eq!(result.unwrap(), "done");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn stops_when_mapping_returns_none() {
    let attempts = counter();
    let result: Result<(), _> = poll(
        PollConfig::default(),
        {
            let attempts = attempts.clone();
            move || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async move { Err(PollError::Fatal) }
            }
        },
        |error, _ctx| match error {
            PollError::Pending => Some(Backoff::none()),
            PollError::Fatal => None,
        },
    )
    .await;

    assert_eq!(result.unwrap_err(), RetryError::Operation(PollError::Fatal));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn stops_when_backoff_evaluation_yields_nothing() {
    use crate::backoff::BackoffTransform;
    use rand::RngCore;

    struct Veto;
    impl BackoffTransform for Veto {
        fn apply(
            &self,
            _delay: Duration,
            _attempt: u32,
            _context: &AttemptContext,
            _rng: &mut dyn RngCore,
        ) -> Option<Duration> {
            None
        }
    }

    let attempts = counter();
    let result: Result<(), _> = poll(
        PollConfig::default(),
        {
            let attempts = attempts.clone();
            move || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async move { Err(PollError::Pending) }
            }
        },
        |_e, _ctx| Some(Backoff::none().with_transform(Veto)),
    )
    .await;

    assert_eq!(
        result.unwrap_err(),
        RetryError::Operation(PollError::Pending)
    );
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn overrunning_delay_stops_without_sleeping() {
    let attempts = counter();
    let config = PollConfig::default().with_max_elapsed(Duration::from_millis(200));
    let start = Instant::now();
    let result: Result<(), _> = poll(
        config,
        {
            let attempts = attempts.clone();
            move || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async move { Err(PollError::Pending) }
            }
        },
        |_e, _ctx| Some(Backoff::constant(Duration::from_secs(60))),
    )
    .await;

    assert_eq!(
        result.unwrap_err(),
        RetryError::Operation(PollError::Pending)
    );
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    assert!(start.elapsed() < Duration::from_secs(5), "must not have slept");
}

#[tokio::test]
async fn spent_budget_stops_before_consulting_the_mapping() {
    let attempts = counter();
    let config = PollConfig::default().with_max_elapsed(Duration::from_millis(5));
    let result: Result<(), _> = poll(
        config,
        {
            let attempts = attempts.clone();
            move || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    Err(PollError::Pending)
                }
            }
        },
        |_e, _ctx| -> Option<Backoff> { panic!("mapping must not run once the budget is spent") },
    )
    .await;

    assert_eq!(
        result.unwrap_err(),
        RetryError::Operation(PollError::Pending)
    );
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn context_counts_every_attempt() {
    let attempts = counter();
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let result = poll(
        PollConfig::default(),
        {
            let attempts = attempts.clone();
            move || {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 3 {
                        Err(PollError::Pending)
                    } else {
                        Ok(())
                    }
                }
            }
        },
        {
            let seen = seen.clone();
            move |_e: &PollError, ctx: &AttemptContext| {
                seen.lock().unwrap().push(*ctx);
                Some(Backoff::constant(Duration::from_millis(1)))
            }
        },
    )
    .await;

    assert!(result.is_ok());
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    for (i, ctx) in seen.iter().enumerate() {
        assert_eq!(ctx.attempt_index, i as u32);
        assert_eq!(ctx.counted_attempts, i as u32);
    }
}

#[tokio::test]
async fn cancellation_during_sleep_aborts_the_session() {
    let attempts = counter();
    let token = CancellationToken::new();
    let session = {
        let attempts = attempts.clone();
        let token = token.clone();
        tokio::spawn(async move {
            poll_with_cancel(
                PollConfig::default(),
                &token,
                move || {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    async move { Err::<(), _>(PollError::Pending) }
                },
                |_e, _ctx| Some(Backoff::constant(Duration::from_secs(60))),
            )
            .await
        })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    token.cancel();

    let result = session.await.unwrap();
    assert_eq!(result.unwrap_err(), RetryError::Cancelled);
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}
