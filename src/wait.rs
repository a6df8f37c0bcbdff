//! Cancellation-aware sleeping shared by the retry and poll loops.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Sleep for `delay`, observing the token before suspending, during the
/// sleep, and again on wake.
///
/// Returns `false` if cancellation was observed at any of those points.
pub(crate) async fn sleep_through(cancel: &CancellationToken, delay: Duration) -> bool {
    if cancel.is_cancelled() {
        return false;
    }
    tokio::select! {
        _ = cancel.cancelled() => return false,
        _ = tokio::time::sleep(delay) => {}
    }
    !cancel.is_cancelled()
}
