//! Terminal error for retry and poll sessions.

use std::fmt;

/// Why a retry or poll session ended without a success.
///
/// Every policy-driven termination path — an explicit stop, an exhausted
/// attempt ceiling, a spent elapsed budget, a backoff that yields no delay —
/// re-surfaces the *last observed operation error* exactly as the operation
/// produced it. Cancellation is the one exception: it pre-empts any retry
/// decision and surfaces as [`RetryError::Cancelled`].
///
/// Callers that need a distinguishable "gave up" signal should encode it in
/// the error type their operation returns; the library imposes no wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryError<E> {
    /// The operation's own error, surfaced untouched.
    Operation(E),
    /// The session's cancellation token fired between attempts.
    Cancelled,
}

impl<E> RetryError<E> {
    /// Returns true if the session was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Get a reference to the operation error, if any.
    pub fn operation(&self) -> Option<&E> {
        match self {
            Self::Operation(e) => Some(e),
            Self::Cancelled => None,
        }
    }

    /// Extract the operation error, if any.
    pub fn into_operation(self) -> Option<E> {
        match self {
            Self::Operation(e) => Some(e),
            Self::Cancelled => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operation(e) => write!(f, "{}", e),
            Self::Cancelled => write!(f, "session cancelled"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Operation(e) => Some(e),
            Self::Cancelled => None,
        }
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn operation_error_passes_display_through() {
        let err = RetryError::Operation("connection refused");
        assert_eq!(format!("{}", err), "connection refused");
    }

    #[test]
    fn cancelled_has_its_own_display() {
        // Neutral wording: the same error type serves retry and poll sessions.
        let err: RetryError<String> = RetryError::Cancelled;
        assert_eq!(format!("{}", err), "session cancelled");
        assert!(err.is_cancelled());
    }

    #[test]
    fn accessors_expose_the_operation_error() {
        let err = RetryError::Operation(7);
        assert_eq!(err.operation(), Some(&7));
        assert_eq!(err.into_operation(), Some(7));
        assert_eq!(RetryError::<i32>::Cancelled.into_operation(), None);
    }
}
