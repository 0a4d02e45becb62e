//! Suite declaration
//!
//! A [`SuiteBuilder`] is threaded by `&mut` through nested declaration
//! closures — there is no process-wide registration state, so multiple
//! independent trees can be declared and run in isolation.
//!
//! Declaring a group pushes a frame onto the builder's stack; the group's
//! closure registers examples, hooks and subgroups into that frame; when
//! the closure returns, the frame is popped and the group is appended to
//! its parent's child list. Example bodies are stored, never executed here.

use std::future::Future;

use anyhow::Result;
use futures::FutureExt;

use crate::tree::{Body, Example, GroupId, Node, SuiteTree};

/// Builds one [`SuiteTree`] through nested `describe`/`it` calls.
pub struct SuiteBuilder {
    tree: SuiteTree,
    /// Currently-open group frames, innermost last. The root frame is
    /// pushed at construction and never popped.
    frames: Vec<GroupId>,
}

impl SuiteBuilder {
    pub fn new() -> Self {
        let tree = SuiteTree::new();
        let root = tree.root();
        Self {
            tree,
            frames: vec![root],
        }
    }

    fn current(&self) -> GroupId {
        *self.frames.last().expect("root frame is never popped")
    }

    /// Declare a nested group. The closure runs synchronously and
    /// registers the group's children; nesting depth is unbounded and
    /// derived, never supplied.
    pub fn describe(&mut self, label: impl Into<String>, build: impl FnOnce(&mut SuiteBuilder)) {
        let parent = self.current();
        let id = self.tree.alloc_group(label.into(), parent);
        self.frames.push(id);
        build(self);
        self.frames.pop();
        self.tree.group_mut(parent).children.push(Node::Group(id));
    }

    /// Synonym for [`describe`](Self::describe).
    pub fn context(&mut self, label: impl Into<String>, build: impl FnOnce(&mut SuiteBuilder)) {
        self.describe(label, build);
    }

    /// Declare an example. The body is stored for the runner; it is not
    /// invoked here.
    pub fn it(&mut self, label: impl Into<String>, body: impl Fn() -> Result<()> + 'static) {
        self.push_example(label.into(), Body::Sync(Box::new(body)));
    }

    /// Declare an example with an asynchronous body. The runner drives the
    /// future to completion before moving on.
    pub fn it_async<F, Fut>(&mut self, label: impl Into<String>, body: F)
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<()>> + 'static,
    {
        self.push_example(label.into(), Body::Async(Box::new(move || body().boxed_local())));
    }

    /// Register a setup hook on the current group. It runs before each
    /// example within the group's scope, including nested groups.
    pub fn before_each(&mut self, hook: impl Fn() -> Result<()> + 'static) {
        let id = self.current();
        self.tree
            .group_mut(id)
            .setup_hooks
            .push(Body::Sync(Box::new(hook)));
    }

    /// Asynchronous variant of [`before_each`](Self::before_each).
    pub fn before_each_async<F, Fut>(&mut self, hook: F)
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<()>> + 'static,
    {
        let id = self.current();
        self.tree
            .group_mut(id)
            .setup_hooks
            .push(Body::Async(Box::new(move || hook().boxed_local())));
    }

    /// Register a teardown hook on the current group. It runs after each
    /// example within the group's scope, including nested groups.
    pub fn after_each(&mut self, hook: impl Fn() -> Result<()> + 'static) {
        let id = self.current();
        self.tree
            .group_mut(id)
            .teardown_hooks
            .push(Body::Sync(Box::new(hook)));
    }

    /// Asynchronous variant of [`after_each`](Self::after_each).
    pub fn after_each_async<F, Fut>(&mut self, hook: F)
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<()>> + 'static,
    {
        let id = self.current();
        self.tree
            .group_mut(id)
            .teardown_hooks
            .push(Body::Async(Box::new(move || hook().boxed_local())));
    }

    /// Finish declaring and hand the tree to a runner.
    pub fn into_tree(self) -> SuiteTree {
        self.tree
    }

    fn push_example(&mut self, label: String, body: Body) {
        let id = self.current();
        let depth = self.tree.group(id).depth + 1;
        self.tree
            .group_mut(id)
            .children
            .push(Node::Example(Example { label, depth, body }));
    }
}

impl Default for SuiteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::HookKind;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Helper: labels of a group's children, `[..]` marking subgroups.
    fn child_labels(tree: &SuiteTree, id: GroupId) -> Vec<String> {
        tree.group(id)
            .children
            .iter()
            .map(|node| match node {
                Node::Group(id) => format!("[{}]", tree.group(*id).label.as_deref().unwrap_or("")),
                Node::Example(ex) => ex.label.clone(),
            })
            .collect()
    }

    #[test]
    fn test_children_preserve_declaration_order() {
        let mut suite = SuiteBuilder::new();
        suite.describe("root group", |s| {
            s.it("first", || Ok(()));
            s.describe("middle", |_| {});
            s.it("last", || Ok(()));
        });
        let tree = suite.into_tree();
        let root = tree.root();
        assert_eq!(child_labels(&tree, root), vec!["[root group]"]);
        let Node::Group(id) = tree.group(root).children[0] else {
            panic!("expected a group child");
        };
        assert_eq!(child_labels(&tree, id), vec!["first", "[middle]", "last"]);
    }

    #[test]
    fn test_declaring_does_not_execute_bodies() {
        let calls = Rc::new(Cell::new(0));
        let counted = Rc::clone(&calls);
        let mut suite = SuiteBuilder::new();
        suite.describe("group", move |s| {
            let counted = Rc::clone(&counted);
            s.it("example", move || {
                counted.set(counted.get() + 1);
                Ok(())
            });
        });
        suite.into_tree();
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_depth_increases_per_nesting_level() {
        let mut suite = SuiteBuilder::new();
        suite.describe("a", |s| {
            s.describe("b", |s| {
                s.it("leaf", || Ok(()));
            });
        });
        let tree = suite.into_tree();
        let Node::Group(a) = tree.group(tree.root()).children[0] else {
            panic!("expected group");
        };
        let Node::Group(b) = tree.group(a).children[0] else {
            panic!("expected group");
        };
        let Node::Example(ref leaf) = tree.group(b).children[0] else {
            panic!("expected example");
        };
        assert_eq!(tree.group(a).depth, 0);
        assert_eq!(tree.group(b).depth, 1);
        assert_eq!(leaf.depth, 2);
    }

    #[test]
    fn test_hooks_register_on_the_open_frame() {
        let mut suite = SuiteBuilder::new();
        suite.describe("outer", |s| {
            s.before_each(|| Ok(()));
            s.describe("inner", |s| {
                s.before_each(|| Ok(()));
                s.after_each(|| Ok(()));
            });
        });
        let tree = suite.into_tree();
        let Node::Group(outer) = tree.group(tree.root()).children[0] else {
            panic!("expected group");
        };
        let Node::Group(inner) = tree.group(outer).children[0] else {
            panic!("expected group");
        };
        assert_eq!(tree.group(outer).setup_hooks.len(), 1);
        assert_eq!(tree.group(outer).teardown_hooks.len(), 0);
        assert_eq!(tree.group(inner).setup_hooks.len(), 1);
        assert_eq!(tree.group(inner).teardown_hooks.len(), 1);
        assert_eq!(tree.resolve_hooks(HookKind::Setup, inner).len(), 2);
    }

    #[test]
    fn test_context_is_a_synonym_for_describe() {
        let mut suite = SuiteBuilder::new();
        suite.context("ctx", |s| {
            s.it("example", || Ok(()));
        });
        let tree = suite.into_tree();
        assert_eq!(child_labels(&tree, tree.root()), vec!["[ctx]"]);
    }

    #[test]
    fn test_independent_builders_do_not_share_state() {
        let mut first = SuiteBuilder::new();
        let mut second = SuiteBuilder::new();
        first.describe("only in first", |_| {});
        second.it("only in second", || Ok(()));
        let first = first.into_tree();
        let second = second.into_tree();
        assert_eq!(child_labels(&first, first.root()), vec!["[only in first]"]);
        assert_eq!(child_labels(&second, second.root()), vec!["only in second"]);
    }
}
