//! minispec: a minimal BDD-style test harness
//!
//! Nested suites, per-group setup/teardown hooks, matchers, and a
//! sequential run driver with a deterministic, declaration-ordered walk.
//!
//! # Overview
//!
//! A suite is declared through a [`SuiteBuilder`] threaded through nested
//! closures, then handed to a [`Runner`] which executes it exactly once
//! and prints a summary:
//!
//! ```no_run
//! use std::process::ExitCode;
//! use minispec::{expect, Runner, SuiteBuilder};
//!
//! fn main() -> ExitCode {
//!     let mut suite = SuiteBuilder::new();
//!     suite.describe("Calculator", |s| {
//!         s.before_each(|| Ok(()));
//!         s.it("adds", || expect(2 + 3).to_be(5));
//!         s.context("with negatives", |s| {
//!             s.it("subtracts through zero", || expect(1 - 3).to_be(-2));
//!         });
//!     });
//!
//!     let mut runner = Runner::new(suite);
//!     runner.run();
//!     runner.exit_code()
//! }
//! ```
//!
//! Or, embedded in a regular `#[test]`, via [`run_and_assert`].
//!
//! # Matchers
//!
//! | Matcher | Checks |
//! |---------|--------|
//! | `to_be` | equality by `PartialEq` |
//! | `to_equal` | deep equality by serialized form |
//! | `to_be_a::<U>` | type membership |
//! | `to_contain` | substring containment |
//! | `to_start_with` | prefix containment |
//! | `to_end_with` | suffix containment |
//! | `to_match` | regex pattern match |
//! | `to_raise` | callable raises, optional message pattern |
//!
//! Every matcher has a negated form via `.not()`.
//!
//! # Execution model
//!
//! Single logical thread: examples run depth-first in declaration order,
//! setup hooks outermost-first before each example, teardown hooks
//! outermost-first after it (the same order as setup — deliberately not
//! stack-unwind order). Asynchronous bodies and hooks are driven to
//! completion before the walk continues. One example's failure never
//! aborts its siblings, and a failing teardown hook never blocks the rest
//! of the teardown chain.

mod builder;
pub use builder::SuiteBuilder;

mod tree;
pub use tree::{Body, Example, Group, GroupId, HookKind, Node, SuiteTree};

mod matchers;
pub use matchers::{expect, Expectation};

mod runner;
pub use runner::{run_and_assert, RunStats, Runner};

mod report;
pub use report::Reporter;

mod error;
pub use error::{ExpectationError, FailureKind};
