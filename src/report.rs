//! Console reporting
//!
//! Output format:
//! - group line: bold label, indented `2 * depth` spaces
//! - example line: unstyled label, indented `2 * depth` spaces
//! - failure: blank line before and after, message in red
//! - summary: underline-styled, four counts joined by ", "
//!
//! The reporter writes to any `io::Write`, so tests capture output into a
//! `Vec<u8>`. Styling is disabled when the `NO_COLOR` environment variable
//! is set.

use std::io;

use yansi::Paint;

use crate::runner::RunStats;

/// Writes run progress and the final summary.
pub struct Reporter<W: io::Write> {
    out: W,
    color: bool,
}

impl Reporter<io::Stdout> {
    /// Reporter on standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: io::Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            color: std::env::var_os("NO_COLOR").is_none(),
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub(crate) fn group_label(&mut self, label: &str, depth: i32) {
        if self.color {
            self.line(&format!("{}{}", indent(depth), label.bold()));
        } else {
            self.line(&format!("{}{}", indent(depth), label));
        }
    }

    pub(crate) fn example_label(&mut self, label: &str, depth: i32) {
        self.line(&format!("{}{}", indent(depth), label));
    }

    /// Print a failure message, blank-line wrapped so it stands apart from
    /// the progress lines around it.
    pub(crate) fn failure(&mut self, message: &str) {
        self.line("");
        if self.color {
            self.line(&format!("{}", message.red()));
        } else {
            self.line(message);
        }
        self.line("");
    }

    pub(crate) fn summary(&mut self, stats: &RunStats) {
        let text = format!(
            "{}, {}, {}, {}",
            pluralize(stats.errors, "errors"),
            pluralize(stats.examples, "examples"),
            pluralize(stats.failures, "failures"),
            pluralize(stats.suites, "suites"),
        );
        if self.color {
            self.line(&format!("{}", text.underline()));
        } else {
            self.line(&text);
        }
    }

    // A reporter failure must not abort the run; write errors are dropped.
    fn line(&mut self, s: &str) {
        let _ = writeln!(self.out, "{}", s);
    }
}

fn indent(depth: i32) -> String {
    "  ".repeat(depth.max(0) as usize)
}

/// Naive pluralization: strip a trailing `s` to get the singular, append
/// it back unless the count is exactly 1.
fn pluralize(count: usize, noun: &str) -> String {
    let singular = noun.strip_suffix('s').unwrap_or(noun);
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}s", count, singular)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured(build: impl FnOnce(&mut Reporter<&mut Vec<u8>>)) -> String {
        let mut buf = Vec::new();
        let mut reporter = Reporter::new(&mut buf).with_color(false);
        build(&mut reporter);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_pluralize_singular_and_plural() {
        assert_eq!(pluralize(0, "suites"), "0 suites");
        assert_eq!(pluralize(1, "suites"), "1 suite");
        assert_eq!(pluralize(2, "suites"), "2 suites");
        assert_eq!(pluralize(1, "failures"), "1 failure");
    }

    #[test]
    fn test_indent_is_two_spaces_per_depth() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(1), "  ");
        assert_eq!(indent(2), "    ");
        // The synthetic root's depth never produces a negative indent.
        assert_eq!(indent(-1), "");
    }

    #[test]
    fn test_summary_key_order_and_format() {
        let out = captured(|r| {
            r.summary(&RunStats {
                suites: 1,
                examples: 2,
                failures: 1,
                errors: 0,
            })
        });
        assert_eq!(out, "0 errors, 2 examples, 1 failure, 1 suite\n");
    }

    #[test]
    fn test_failure_is_blank_line_wrapped() {
        let out = captured(|r| r.failure("expected 1 to be 2"));
        assert_eq!(out, "\nexpected 1 to be 2\n\n");
    }

    #[test]
    fn test_labels_are_indented() {
        let out = captured(|r| {
            r.group_label("outer", 0);
            r.group_label("inner", 1);
            r.example_label("does a thing", 2);
        });
        assert_eq!(out, "outer\n  inner\n    does a thing\n");
    }
}
