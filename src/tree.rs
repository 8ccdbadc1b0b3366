//! The routing tree cells.
//!
//! A [`Node`] stores a compressed run of literal bytes plus child edges split
//! by segment kind: static children indexed by their first byte, at most one
//! parameter child and at most one catch-all child. Terminals additionally
//! carry a [`Leaf`] with the per-method handler table and the parameter names
//! collected along the path.

use http::Method;
use indexmap::IndexMap;

/// Terminal payload of one or more registered patterns ending at a node.
pub(crate) struct Leaf<T> {
    /// Method table, in registration order.
    pub(crate) handlers: IndexMap<Method, T>,
    /// Names of the `:param`/`*catchall` segments on the path from the root,
    /// in registration order.
    pub(crate) param_names: Vec<String>,
    /// The original registered pattern, verbatim.
    pub(crate) route: String,
    /// True when the terminal was reached through a catch-all segment.
    /// Disables the trailing-slash redirect for this terminal.
    pub(crate) is_catchall: bool,
    /// True when the registered pattern ended with `/` (the root excluded).
    pub(crate) add_slash: bool,
}

impl<T> Leaf<T> {
    pub(crate) fn new(route: String, param_names: Vec<String>, is_catchall: bool, add_slash: bool) -> Self {
        Self {
            handlers: IndexMap::new(),
            param_names,
            route,
            is_catchall,
            add_slash,
        }
    }
}

/// A cell of the compressed radix tree.
///
/// `indices` runs parallel to `static_children`: `indices[i]` is the first
/// byte of `static_children[i].path`, and both stay ordered by descending
/// `priority` so the busiest branches are probed first.
pub(crate) struct Node<T> {
    /// The literal byte run this node matches. Empty at the root, which
    /// represents the leading `/` stripped from every pattern and request.
    /// Kept as raw bytes: splitting at a divergence point may land inside a
    /// multi-byte character.
    pub(crate) path: Vec<u8>,
    /// Number of registered routes whose search path passes through here.
    pub(crate) priority: u32,
    /// First byte of each static child's `path`.
    pub(crate) indices: Vec<u8>,
    /// Static children, ordered by descending priority.
    pub(crate) static_children: Vec<Node<T>>,
    /// Child for a `:name` segment; matches a non-empty run up to `/`.
    pub(crate) param_child: Option<Box<Node<T>>>,
    /// Child for a `*name` segment; consumes the remainder and is terminal.
    pub(crate) catchall_child: Option<Box<Node<T>>>,
    /// Present when one or more patterns end here.
    pub(crate) leaf: Option<Leaf<T>>,
}

impl<T> Node<T> {
    pub(crate) fn new(path: Vec<u8>) -> Self {
        Self {
            path,
            priority: 0,
            indices: Vec::new(),
            static_children: Vec::new(),
            param_child: None,
            catchall_child: None,
            leaf: None,
        }
    }

    /// Position of the static child whose `path` begins with `byte`.
    pub(crate) fn static_child_index(&self, byte: u8) -> Option<usize> {
        self.indices.iter().position(|&b| b == byte)
    }

    /// Bumps the priority of the child at `pos` and floats it towards the
    /// front past siblings with a lower count, keeping `indices` in step.
    /// Returns the child's new position.
    pub(crate) fn bump_static_child(&mut self, pos: usize) -> usize {
        self.static_children[pos].priority += 1;
        let priority = self.static_children[pos].priority;

        let mut new_pos = pos;
        while new_pos > 0 && self.static_children[new_pos - 1].priority < priority {
            self.static_children.swap(new_pos - 1, new_pos);
            self.indices.swap(new_pos - 1, new_pos);
            new_pos -= 1;
        }

        new_pos
    }
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
