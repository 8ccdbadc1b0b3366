//! Route lookup: resolving a request path against the radix tree.

use crate::tree::Node;

/// Resolves `path` (leading slash already stripped) to a terminal node.
///
/// Returns the terminal together with the raw captured wildcard values in
/// reverse (deepest-first) order; the caller pairs them with the terminal's
/// stored parameter names. The terminal is returned even when the method the
/// caller cares about is not registered on it, so that a 405 can be told
/// apart from a full miss.
pub(crate) fn search<'t, 'p, T>(
    root: &'t Node<T>,
    path: &'p [u8],
) -> Option<(&'t Node<T>, Vec<&'p [u8]>)> {
    let mut captures = Vec::new();
    descend(root, path, &mut captures).map(|node| (node, captures))
}

/// One step of the walk: consume this node's prefix, then probe children in
/// the fixed static → param → catch-all order. Recursion gives backtracking
/// for free, and captures are pushed on the way back out.
fn descend<'t, 'p, T>(
    node: &'t Node<T>,
    input: &'p [u8],
    captures: &mut Vec<&'p [u8]>,
) -> Option<&'t Node<T>> {
    let rest = input.strip_prefix(node.path.as_slice())?;

    if rest.is_empty() {
        return node.leaf.as_ref().map(|_| node);
    }

    if let Some(i) = node.static_child_index(rest[0]) {
        if let Some(hit) = descend(&node.static_children[i], rest, captures) {
            return Some(hit);
        }
    }

    if let Some(param) = node.param_child.as_deref() {
        let split = rest
            .iter()
            .position(|&b| b == b'/')
            .unwrap_or(rest.len());
        let (value, tail) = rest.split_at(split);
        if !value.is_empty() {
            if let Some(hit) = descend(param, tail, captures) {
                captures.push(value);
                return Some(hit);
            }
        }
    }

    if let Some(catchall) = node.catchall_child.as_deref() {
        if catchall.leaf.is_some() {
            captures.push(rest);
            return Some(catchall);
        }
    }

    None
}
