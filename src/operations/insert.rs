//! Route registration: merging a parsed pattern into the radix tree.

use http::Method;

use crate::error::RouteError;
use crate::tree::{Leaf, Node};
use crate::types::Segment;

use super::util::{Chunk, chunk_segments, parse_pattern};

/// Inserts `value` for `(method, pattern)` into the tree rooted at `root`.
///
/// On success every node along the search path has its priority bumped and
/// static siblings are re-ordered; on failure the tree is structurally
/// unchanged (a duplicate registration walks an already-existing path).
pub(crate) fn insert<T>(
    root: &mut Node<T>,
    method: Method,
    pattern: &str,
    value: T,
) -> Result<(), RouteError> {
    let (segments, add_slash) = parse_pattern(pattern)?;

    let param_names: Vec<String> = segments
        .iter()
        .filter_map(|segment| match segment {
            Segment::Param(name) | Segment::CatchAll(name) => Some(name.clone()),
            Segment::Literal(_) => None,
        })
        .collect();
    let is_catchall = matches!(segments.last(), Some(Segment::CatchAll(_)));
    let chunks = chunk_segments(&segments);

    let mut registration = Registration {
        method,
        pattern,
        param_names: Some(param_names),
        value: Some(value),
        is_catchall,
        add_slash,
    };

    insert_at(root, b"", &chunks, &mut registration)?;
    root.priority += 1;
    Ok(())
}

struct Registration<'a, T> {
    method: Method,
    pattern: &'a str,
    param_names: Option<Vec<String>>,
    value: Option<T>,
    is_catchall: bool,
    add_slash: bool,
}

/// Recursive insertion step. `node`'s own prefix is already accounted for;
/// `text` is the unconsumed remainder of the current literal run and `rest`
/// the chunks after it. Priorities are bumped on the way back out, so a
/// failed insertion never skews the ordering.
fn insert_at<T>(
    node: &mut Node<T>,
    text: &[u8],
    rest: &[Chunk],
    registration: &mut Registration<'_, T>,
) -> Result<(), RouteError> {
    if text.is_empty() {
        let Some((chunk, rest)) = rest.split_first() else {
            return attach(node, registration);
        };

        return match chunk {
            Chunk::Text(run) => insert_at(node, run.as_bytes(), rest, registration),
            Chunk::Param(_) => {
                let child = node
                    .param_child
                    .get_or_insert_with(|| Box::new(Node::new(Vec::new())));
                insert_at(child, b"", rest, registration)?;
                child.priority += 1;
                Ok(())
            }
            Chunk::CatchAll(_) => {
                let child = node
                    .catchall_child
                    .get_or_insert_with(|| Box::new(Node::new(Vec::new())));
                insert_at(child, b"", rest, registration)?;
                child.priority += 1;
                Ok(())
            }
        };
    }

    let first = text[0];
    match node.static_child_index(first) {
        Some(i) => {
            let child = &mut node.static_children[i];
            let common = common_prefix_len(text, &child.path);
            if common < child.path.len() {
                split_static_child(child, common);
            }

            let child = &mut node.static_children[i];
            let consumed = child.path.len();
            insert_at(child, &text[consumed..], rest, registration)?;
            node.bump_static_child(i);
            Ok(())
        }
        None => {
            node.indices.push(first);
            node.static_children.push(Node::new(text.to_vec()));

            let pos = node.static_children.len() - 1;
            insert_at(&mut node.static_children[pos], b"", rest, registration)?;
            node.bump_static_child(pos);
            Ok(())
        }
    }
}

/// Records the registration at `node`, creating the leaf if this is the first
/// pattern ending here. The first registration fixes the leaf's pattern
/// string, parameter names and trailing-slash bit; later methods only join
/// the handler table.
fn attach<T>(node: &mut Node<T>, registration: &mut Registration<'_, T>) -> Result<(), RouteError> {
    let Registration {
        method,
        pattern,
        param_names,
        value,
        is_catchall,
        add_slash,
    } = registration;

    let leaf = node.leaf.get_or_insert_with(|| {
        Leaf::new(
            (*pattern).to_owned(),
            param_names.take().unwrap_or_default(),
            *is_catchall,
            *add_slash,
        )
    });

    if leaf.handlers.contains_key(method) {
        return Err(RouteError::DuplicateMethod {
            method: method.clone(),
            pattern: (*pattern).to_owned(),
        });
    }
    if let Some(value) = value.take() {
        leaf.handlers.insert(method.clone(), value);
    }
    Ok(())
}

/// Splits `child` at `common`: the node keeps the shared prefix (and its
/// priority, which still counts the same descendants) while its previous
/// contents move into a single new child carrying the diverging tail.
fn split_static_child<T>(child: &mut Node<T>, common: usize) {
    let tail = child.path.split_off(common);

    let moved = Node {
        path: tail,
        priority: child.priority,
        indices: std::mem::take(&mut child.indices),
        static_children: std::mem::take(&mut child.static_children),
        param_child: child.param_child.take(),
        catchall_child: child.catchall_child.take(),
        leaf: child.leaf.take(),
    };

    child.indices = vec![moved.path[0]];
    child.static_children = vec![moved];
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
