//! Floating-point duration scaling shared by baselines and jitter transforms.

use std::time::Duration;

/// Scale a duration by a factor, refusing degenerate inputs.
///
/// Returns `None` when the factor is negative or not finite, or when the
/// scaled value cannot be represented as a `Duration`. Jitter transforms
/// propagate that `None` through the chain's abort path instead of panicking
/// mid-session.
pub(crate) fn scale_duration(d: Duration, factor: f64) -> Option<Duration> {
    if !factor.is_finite() || factor < 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(d.as_secs_f64() * factor).ok()
}

/// Scale a duration by a factor, saturating at `Duration::MAX`.
///
/// Baseline parameters are validated at construction, so the only way this
/// saturates is runtime overflow (e.g. a large exponent). A baseline must
/// return a total `Duration`, hence saturation rather than `None`.
pub(crate) fn scale_saturating(d: Duration, factor: f64) -> Duration {
    scale_duration(d, factor).unwrap_or(Duration::MAX)
}
