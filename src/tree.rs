//! Suite tree
//!
//! Groups live in an arena indexed by [`GroupId`]; each group stores its
//! parent's id, so hook resolution walks the id chain instead of following
//! in-memory back-references. The tree is mutated only while a
//! [`SuiteBuilder`](crate::builder::SuiteBuilder) declares it and is
//! read-only during execution.

use anyhow::Result;
use futures::future::LocalBoxFuture;

/// Index of a group record in the [`SuiteTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupId(pub(crate) usize);

/// Which per-example hook list is being addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    /// Runs before each example in scope.
    Setup,
    /// Runs after each example in scope.
    Teardown,
}

/// A zero-argument callable used for hooks and example bodies.
///
/// May be synchronous or asynchronous; either way [`Body::call`] returns
/// only once the work has fully completed, so the engine never interleaves
/// two bodies.
pub enum Body {
    Sync(Box<dyn Fn() -> Result<()>>),
    Async(Box<dyn Fn() -> LocalBoxFuture<'static, Result<()>>>),
}

impl Body {
    /// Invoke the callable, driving async variants to completion.
    pub fn call(&self) -> Result<()> {
        match self {
            Body::Sync(f) => f(),
            Body::Async(f) => futures::executor::block_on(f()),
        }
    }
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Body::Sync(_) => f.write_str("Body::Sync"),
            Body::Async(_) => f.write_str("Body::Async"),
        }
    }
}

/// A single named test case. The body is never executed at declaration
/// time; execution is deferred entirely to the runner.
#[derive(Debug)]
pub struct Example {
    pub label: String,
    /// Parent group's depth + 1.
    pub depth: i32,
    pub body: Body,
}

/// A child of a group: a nested group (by arena id) or an owned example.
#[derive(Debug)]
pub enum Node {
    Group(GroupId),
    Example(Example),
}

/// A named, ordered collection of nested groups/examples plus the hooks
/// registered directly in it (inherited hooks are resolved at run time).
#[derive(Debug)]
pub struct Group {
    /// Display name; `None` only for the synthetic root.
    pub label: Option<String>,
    /// Nesting level: root is −1, +1 per nested group.
    pub depth: i32,
    /// Enclosing group's id; `None` only for the root.
    pub parent: Option<GroupId>,
    /// Declaration order is semantically significant: execution follows it.
    pub children: Vec<Node>,
    pub setup_hooks: Vec<Body>,
    pub teardown_hooks: Vec<Body>,
}

impl Group {
    fn new(label: Option<String>, depth: i32, parent: Option<GroupId>) -> Self {
        Self {
            label,
            depth,
            parent,
            children: Vec::new(),
            setup_hooks: Vec::new(),
            teardown_hooks: Vec::new(),
        }
    }

    fn hooks(&self, kind: HookKind) -> &[Body] {
        match kind {
            HookKind::Setup => &self.setup_hooks,
            HookKind::Teardown => &self.teardown_hooks,
        }
    }
}

/// Arena of group records. Index 0 is always the synthetic root group
/// (no label, depth −1).
#[derive(Debug)]
pub struct SuiteTree {
    groups: Vec<Group>,
}

impl SuiteTree {
    pub(crate) fn new() -> Self {
        Self {
            groups: vec![Group::new(None, -1, None)],
        }
    }

    /// Id of the synthetic root group.
    pub fn root(&self) -> GroupId {
        GroupId(0)
    }

    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id.0]
    }

    pub(crate) fn group_mut(&mut self, id: GroupId) -> &mut Group {
        &mut self.groups[id.0]
    }

    /// Allocate a new group record under `parent`. The caller is
    /// responsible for appending the returned id to the parent's children
    /// once the group's declaration body has finished.
    pub(crate) fn alloc_group(&mut self, label: String, parent: GroupId) -> GroupId {
        let depth = self.groups[parent.0].depth + 1;
        let id = GroupId(self.groups.len());
        self.groups
            .push(Group::new(Some(label), depth, Some(parent)));
        id
    }

    /// Resolve the effective hook chain of the requested kind for an
    /// example declared directly under `group`.
    ///
    /// Walks the parent ids up to the root and concatenates each visited
    /// group's own hooks so that the root's hooks come first and the
    /// immediate parent's last (outermost-first). The ordering is the same
    /// for both kinds: teardown hooks are deliberately NOT reversed — they
    /// run in declared order, not stack-unwind order.
    pub fn resolve_hooks(&self, kind: HookKind, group: GroupId) -> Vec<&Body> {
        let mut chain = Vec::new();
        let mut cursor = Some(group);
        while let Some(id) = cursor {
            chain.push(id);
            cursor = self.groups[id.0].parent;
        }
        chain.reverse();
        chain
            .iter()
            .flat_map(|id| self.groups[id.0].hooks(kind).iter())
            .collect()
    }
}
