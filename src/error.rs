//! Failure signal and classification
//!
//! Two kinds of failure can surface from a hook or example body:
//! an [`ExpectationError`] raised by the matcher library (expected and
//! routine), and anything else (programming bugs, stray errors, panics).
//! Both travel through `anyhow::Error`; the runner classifies at the
//! per-example boundary by downcasting.

use std::fmt;

/// The distinguishable assertion-failure signal.
///
/// Raised by matchers when a checked condition does not hold. Carries a
/// human-readable message naming the actual and expected values and the
/// polarity ("to" / "not to").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectationError {
    pub message: String,
}

impl ExpectationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ExpectationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExpectationError {}

/// How a raised error counts against the run statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// An unmet expectation — increments the failure counter.
    Assertion,
    /// Anything else raised during a hook or body — increments the error
    /// counter.
    Unexpected,
}

impl FailureKind {
    /// Classify an error that escaped a hook or body.
    ///
    /// Exactly one kind applies per error: assertion iff the chain carries
    /// an [`ExpectationError`].
    pub fn of(err: &anyhow::Error) -> Self {
        if err.downcast_ref::<ExpectationError>().is_some() {
            FailureKind::Assertion
        } else {
            FailureKind::Unexpected
        }
    }
}

/// Extract a readable message from a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_classify_expectation_error() {
        let err = anyhow::Error::new(ExpectationError::new("expected 1 to be 2"));
        assert_eq!(FailureKind::of(&err), FailureKind::Assertion);
    }

    #[test]
    fn test_classify_plain_error() {
        let err = anyhow!("boom");
        assert_eq!(FailureKind::of(&err), FailureKind::Unexpected);
    }

    #[test]
    fn test_classify_wrapped_expectation_error() {
        let err = anyhow::Error::new(ExpectationError::new("nope")).context("while checking");
        assert_eq!(FailureKind::of(&err), FailureKind::Assertion);
    }

    #[test]
    fn test_display_is_message() {
        let err = ExpectationError::new("expected \"a\" to contain \"b\"");
        assert_eq!(err.to_string(), "expected \"a\" to contain \"b\"");
    }
}
