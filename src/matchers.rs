//! Matcher library
//!
//! `expect(value)` captures a value and exposes a closed, fixed set of
//! named checks. Each check has an affirmative and a negated form
//! (`.not()` flips polarity) and both share a single evaluator
//! parameterized by the polarity flag. On an unmet expectation the check
//! returns an [`ExpectationError`] (through `anyhow::Error`, so `?`
//! threads it out of an example body) with a message naming the actual
//! and expected values and the polarity ("to" / "not to").

use std::any::Any;
use std::fmt::Debug;
use std::panic::{self, AssertUnwindSafe};

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use similar::TextDiff;

use crate::error::{panic_message, ExpectationError};

/// Capture a value for assertion.
pub fn expect<T>(actual: T) -> Expectation<T> {
    Expectation {
        actual,
        negated: false,
    }
}

/// A captured value plus the polarity of the pending check.
pub struct Expectation<T> {
    actual: T,
    negated: bool,
}

impl<T> Expectation<T> {
    /// Negation modifier: inverts the pass/fail polarity of the matcher
    /// that follows.
    pub fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }
}

fn polarity(negated: bool) -> &'static str {
    if negated {
        "not to"
    } else {
        "to"
    }
}

/// The shared evaluator: a check passes when its predicate outcome agrees
/// with the polarity flag; otherwise it raises the assertion signal.
fn verdict(pass: bool, negated: bool, message: String) -> Result<()> {
    if pass != negated {
        Ok(())
    } else {
        Err(anyhow::Error::new(ExpectationError::new(message)))
    }
}

impl<T: PartialEq + Debug> Expectation<T> {
    /// Equality by comparison (`PartialEq`).
    pub fn to_be(self, expected: T) -> Result<()> {
        let pass = self.actual == expected;
        verdict(
            pass,
            self.negated,
            format!(
                "expected {:?} {} be {:?}",
                self.actual,
                polarity(self.negated),
                expected
            ),
        )
    }
}

impl<T: Serialize> Expectation<T> {
    /// Deep equality by structural serialization: two values are equal iff
    /// their JSON forms are textually identical.
    ///
    /// Known approximation, preserved deliberately: the comparison is
    /// sensitive to map key order, and values that cannot be serialized
    /// surface as an unexpected error rather than being dropped.
    pub fn to_equal<U: Serialize>(self, expected: U) -> Result<()> {
        let actual_json = serde_json::to_string(&self.actual)
            .context("to_equal: failed to serialize actual value")?;
        let expected_json = serde_json::to_string(&expected)
            .context("to_equal: failed to serialize expected value")?;
        let pass = actual_json == expected_json;

        let mut message = format!(
            "expected {} {} equal {}",
            actual_json,
            polarity(self.negated),
            expected_json
        );
        if !pass && !self.negated {
            let actual_pretty =
                serde_json::to_string_pretty(&self.actual).unwrap_or_else(|_| actual_json.clone());
            let expected_pretty =
                serde_json::to_string_pretty(&expected).unwrap_or_else(|_| expected_json.clone());
            if actual_pretty != expected_pretty {
                let diff = TextDiff::from_lines(&expected_pretty, &actual_pretty);
                let udiff = diff.unified_diff().header("expected", "actual").to_string();
                message.push('\n');
                message.push_str(udiff.trim_end());
            }
        }
        verdict(pass, self.negated, message)
    }
}

impl<T: Any> Expectation<T> {
    /// Type membership via `std::any::Any`.
    pub fn to_be_a<U: Any>(self) -> Result<()> {
        let pass = (&self.actual as &dyn Any).is::<U>();
        verdict(
            pass,
            self.negated,
            format!(
                "expected a {} {} be a {}",
                std::any::type_name::<T>(),
                polarity(self.negated),
                std::any::type_name::<U>()
            ),
        )
    }
}

impl<T: AsRef<str>> Expectation<T> {
    /// Substring containment.
    pub fn to_contain(self, needle: &str) -> Result<()> {
        let pass = self.actual.as_ref().contains(needle);
        verdict(
            pass,
            self.negated,
            format!(
                "expected {:?} {} contain {:?}",
                self.actual.as_ref(),
                polarity(self.negated),
                needle
            ),
        )
    }

    /// Prefix containment.
    pub fn to_start_with(self, prefix: &str) -> Result<()> {
        let pass = self.actual.as_ref().starts_with(prefix);
        verdict(
            pass,
            self.negated,
            format!(
                "expected {:?} {} start with {:?}",
                self.actual.as_ref(),
                polarity(self.negated),
                prefix
            ),
        )
    }

    /// Suffix containment.
    pub fn to_end_with(self, suffix: &str) -> Result<()> {
        let pass = self.actual.as_ref().ends_with(suffix);
        verdict(
            pass,
            self.negated,
            format!(
                "expected {:?} {} end with {:?}",
                self.actual.as_ref(),
                polarity(self.negated),
                suffix
            ),
        )
    }

    /// Regex pattern matching. An invalid pattern is a usage bug and
    /// surfaces as an unexpected error, not an assertion failure.
    pub fn to_match(self, pattern: &str) -> Result<()> {
        let re = Regex::new(pattern)
            .with_context(|| format!("to_match: invalid pattern {:?}", pattern))?;
        let pass = re.is_match(self.actual.as_ref());
        verdict(
            pass,
            self.negated,
            format!(
                "expected {:?} {} match /{}/",
                self.actual.as_ref(),
                polarity(self.negated),
                pattern
            ),
        )
    }
}

impl<F: FnOnce() -> Result<()>> Expectation<F> {
    /// Checks that a zero-argument callable raises: returns `Err` or
    /// panics. When `pattern` is given, the raised error's message must
    /// match it.
    pub fn to_raise(self, pattern: Option<&str>) -> Result<()> {
        let negated = self.negated;
        let re = match pattern {
            Some(p) => Some(
                Regex::new(p).with_context(|| format!("to_raise: invalid pattern {:?}", p))?,
            ),
            None => None,
        };

        let raised = match panic::catch_unwind(AssertUnwindSafe(self.actual)) {
            Ok(Ok(())) => None,
            Ok(Err(err)) => Some(err.to_string()),
            Err(payload) => Some(panic_message(payload.as_ref())),
        };

        let pass = match (&raised, &re) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(msg), Some(re)) => re.is_match(msg),
        };

        let mut message = match pattern {
            Some(p) => format!(
                "expected block {} raise an error matching /{}/",
                polarity(negated),
                p
            ),
            None => format!("expected block {} raise an error", polarity(negated)),
        };
        if pass == negated {
            if let Some(msg) = &raised {
                message.push_str(&format!(" (raised: {:?})", msg));
            }
        }
        verdict(pass, negated, message)
    }
}
