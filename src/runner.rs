//! Execution engine and run driver
//!
//! Walks the declared tree depth-first in declaration order, runs resolved
//! hooks around each example, classifies failures, and accumulates run
//! statistics. The walk is strictly sequential: every hook and body —
//! including asynchronous ones — completes before the next step starts, so
//! output lines and counter increments appear in exact declaration order.
//!
//! A [`Runner`] executes its tree at most once; the explicit `completed`
//! flag guards against re-triggering.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::process::ExitCode;

use anyhow::anyhow;

use crate::builder::SuiteBuilder;
use crate::error::{panic_message, FailureKind};
use crate::report::Reporter;
use crate::tree::{Body, GroupId, HookKind, Node, SuiteTree};

/// Counters for one run. All start at 0 and increase monotonically;
/// nothing resets mid-run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Declared groups executed.
    pub suites: usize,
    /// Examples driven to completion, whatever their outcome.
    pub examples: usize,
    /// Assertion failures (unmet expectations).
    pub failures: usize,
    /// Unexpected errors (anything else raised, including panics).
    pub errors: usize,
}

/// Executes a declared suite tree exactly once and reports the outcome.
pub struct Runner<W: io::Write> {
    tree: SuiteTree,
    reporter: Reporter<W>,
    stats: RunStats,
    completed: bool,
}

impl Runner<io::Stdout> {
    /// Runner printing to standard output.
    pub fn new(builder: SuiteBuilder) -> Self {
        Self::with_reporter(builder, Reporter::stdout())
    }
}

impl<W: io::Write> Runner<W> {
    pub fn with_reporter(builder: SuiteBuilder, reporter: Reporter<W>) -> Self {
        Self {
            tree: builder.into_tree(),
            reporter,
            stats: RunStats::default(),
            completed: false,
        }
    }

    /// Execute the tree and print the summary. Re-invoking returns the
    /// recorded statistics without executing anything again.
    pub fn run(&mut self) -> &RunStats {
        if self.completed {
            return &self.stats;
        }
        self.completed = true;

        self.run_group(self.tree.root());
        self.reporter.summary(&self.stats);
        &self.stats
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Success iff no assertion failure occurred. Unexpected errors alone
    /// do not fail the run.
    pub fn exit_code(&self) -> ExitCode {
        if self.stats.failures == 0 {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }

    fn run_group(&mut self, id: GroupId) {
        let (label, depth) = {
            let group = self.tree.group(id);
            (group.label.clone(), group.depth)
        };
        // The synthetic root has no label and is neither printed nor
        // counted.
        if let Some(label) = label {
            self.reporter.group_label(&label, depth);
            self.stats.suites += 1;
        }

        let child_count = self.tree.group(id).children.len();
        for idx in 0..child_count {
            let subgroup = match &self.tree.group(id).children[idx] {
                Node::Group(subgroup) => Some(*subgroup),
                Node::Example(_) => None,
            };
            match subgroup {
                Some(subgroup) => self.run_group(subgroup),
                None => self.run_example(id, idx),
            }
        }
    }

    /// One example's life cycle: setup hooks, body, teardown hooks, done.
    fn run_example(&mut self, parent: GroupId, idx: usize) {
        let (label, depth) = match &self.tree.group(parent).children[idx] {
            Node::Example(example) => (example.label.clone(), example.depth),
            Node::Group(_) => return,
        };
        self.reporter.example_label(&label, depth);

        // Setup and body share one failure boundary: the first throwing
        // setup hook skips the remaining setup hooks and the body.
        let failed = {
            let mut first: Option<anyhow::Error> = None;
            for hook in self.tree.resolve_hooks(HookKind::Setup, parent) {
                if let Err(err) = run_guarded(hook) {
                    first = Some(err);
                    break;
                }
            }
            if first.is_none() {
                if let Node::Example(example) = &self.tree.group(parent).children[idx] {
                    first = run_guarded(&example.body).err();
                }
            }
            first
        };
        if let Some(err) = &failed {
            self.record_failure(err);
        }

        // Teardown runs unconditionally, each hook in its own failure
        // boundary: a throwing hook is reported immediately but neither
        // stops the chain nor touches the counters already decided above.
        let teardown_count = self.tree.resolve_hooks(HookKind::Teardown, parent).len();
        for hook_idx in 0..teardown_count {
            let result = run_guarded(self.tree.resolve_hooks(HookKind::Teardown, parent)[hook_idx]);
            if let Err(err) = result {
                let message = format!("after hook: {}", render_failure(&err));
                self.reporter.failure(&message);
            }
        }

        self.stats.examples += 1;
    }

    fn record_failure(&mut self, err: &anyhow::Error) {
        match FailureKind::of(err) {
            FailureKind::Assertion => self.stats.failures += 1,
            FailureKind::Unexpected => self.stats.errors += 1,
        }
        self.reporter.failure(&render_failure(err));
    }
}

/// Assertion failures print their string form; unexpected errors print the
/// full detail including the cause chain.
fn render_failure(err: &anyhow::Error) -> String {
    match FailureKind::of(err) {
        FailureKind::Assertion => err.to_string(),
        FailureKind::Unexpected => format!("{:?}", err),
    }
}

/// Invoke a hook or body, converting a panic into an unexpected error so
/// one example's crash never aborts its siblings.
fn run_guarded(body: &Body) -> anyhow::Result<()> {
    match panic::catch_unwind(AssertUnwindSafe(|| body.call())) {
        Ok(result) => result,
        Err(payload) => Err(anyhow!("panicked: {}", panic_message(payload.as_ref()))),
    }
}

/// Run a declared suite and panic when the run would exit non-zero, so a
/// minispec tree can be embedded in a `#[test]`.
pub fn run_and_assert(builder: SuiteBuilder) {
    let mut runner = Runner::new(builder);
    let stats = *runner.run();
    if stats.failures > 0 {
        panic!("{} assertion failure(s)", stats.failures);
    }
}
