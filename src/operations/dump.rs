//! Debug rendering of the routing tree.

use std::fmt::Write;

use crate::tree::Node;

/// Renders the tree as an indented multiline listing, one node per line:
/// match text (`:`/`*` for wildcard nodes), priority, and at terminals the
/// registered methods plus the original pattern.
pub(crate) fn dump<T>(root: &Node<T>) -> String {
    let mut out = String::new();
    render(root, "/", 0, &mut out);
    out
}

fn render<T>(node: &Node<T>, label: &str, depth: usize, out: &mut String) {
    let _ = write!(out, "{}{} [{}]", "  ".repeat(depth), label, node.priority);
    if let Some(leaf) = &node.leaf {
        let methods: Vec<&str> = leaf.handlers.keys().map(|m| m.as_str()).collect();
        let _ = write!(out, " {} {}", methods.join(","), leaf.route);
    }
    out.push('\n');

    for child in &node.static_children {
        let label = String::from_utf8_lossy(&child.path);
        render(child, &label, depth + 1, out);
    }
    if let Some(param) = node.param_child.as_deref() {
        render(param, ":", depth + 1, out);
    }
    if let Some(catchall) = node.catchall_child.as_deref() {
        render(catchall, "*", depth + 1, out);
    }
}
