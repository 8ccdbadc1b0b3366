//! Pattern parsing and path helpers shared by registration and lookup.

use crate::error::RouteError;
use crate::types::Segment;

/// Wildcard segments with no name are exposed under this key.
pub(crate) const DEFAULT_WILDCARD_NAME: &str = "*";

/// A piece of a pattern as stored in the tree: literal byte runs (with their
/// `/` separators folded in) alternating with wildcard segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Chunk {
    /// A compressed literal run, e.g. `user/` or `/address/`.
    Text(String),
    /// A `:name` segment.
    Param(String),
    /// A `*name` segment; always last.
    CatchAll(String),
}

/// Splits a route pattern into classified segments.
///
/// Returns the segments plus the `add_slash` bit: whether the pattern ended
/// with a significant trailing `/` (the bare root `/` does not count). The
/// trailing slash is stripped from the match text; it only steers the
/// trailing-slash redirect at the terminal.
pub(crate) fn parse_pattern(pattern: &str) -> Result<(Vec<Segment>, bool), RouteError> {
    if pattern.is_empty() {
        return Err(RouteError::EmptyPattern);
    }
    let Some(stripped) = pattern.strip_prefix('/') else {
        return Err(RouteError::MissingLeadingSlash {
            pattern: pattern.to_owned(),
        });
    };

    let add_slash = !stripped.is_empty() && stripped.ends_with('/');
    let stripped = stripped.strip_suffix('/').unwrap_or(stripped);

    let mut segments = Vec::new();
    if stripped.is_empty() {
        // "/" is fine; "//" is an empty segment.
        if add_slash {
            return Err(RouteError::InvalidSegment {
                segment: String::new(),
                reason: "empty segments are not allowed".to_owned(),
            });
        }
        return Ok((segments, false));
    }

    let raw: Vec<&str> = stripped.split('/').collect();
    for (i, part) in raw.iter().enumerate() {
        if part.is_empty() {
            return Err(RouteError::InvalidSegment {
                segment: format!("'' at index {i}"),
                reason: "empty segments are not allowed".to_owned(),
            });
        }

        if let Some(name) = part.strip_prefix(':') {
            segments.push(Segment::Param(wildcard_name(name, part)?));
        } else if let Some(name) = part.strip_prefix('*') {
            if i < raw.len() - 1 {
                return Err(RouteError::CatchAllNotLast {
                    pattern: pattern.to_owned(),
                });
            }
            segments.push(Segment::CatchAll(wildcard_name(name, part)?));
        } else if part.contains([':', '*']) {
            return Err(RouteError::InvalidSegment {
                segment: (*part).to_owned(),
                reason: "':' and '*' may only introduce a segment".to_owned(),
            });
        } else {
            segments.push(Segment::Literal((*part).to_owned()));
        }
    }

    Ok((segments, add_slash))
}

fn wildcard_name(name: &str, segment: &str) -> Result<String, RouteError> {
    if name.contains([':', '*', '/']) {
        return Err(RouteError::InvalidSegment {
            segment: segment.to_owned(),
            reason: "wildcard names may not contain ':' or '*'".to_owned(),
        });
    }
    if name.is_empty() {
        Ok(DEFAULT_WILDCARD_NAME.to_owned())
    } else {
        Ok(name.to_owned())
    }
}

/// Folds parsed segments into the alternating text/wildcard chunks the tree
/// stores: consecutive literals merge into one run, and the `/` separators
/// around wildcards attach to the neighbouring runs.
pub(crate) fn chunk_segments(segments: &[Segment]) -> Vec<Chunk> {
    let mut chunks: Vec<Chunk> = Vec::new();

    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            match chunks.last_mut() {
                Some(Chunk::Text(run)) => run.push('/'),
                _ => chunks.push(Chunk::Text("/".to_owned())),
            }
        }

        match segment {
            Segment::Literal(text) => match chunks.last_mut() {
                Some(Chunk::Text(run)) => run.push_str(text),
                _ => chunks.push(Chunk::Text(text.clone())),
            },
            Segment::Param(name) => chunks.push(Chunk::Param(name.clone())),
            Segment::CatchAll(name) => chunks.push(Chunk::CatchAll(name.clone())),
        }
    }

    chunks
}

/// Drops a single trailing slash from a request path, remembering that it was
/// present. The bare root `/` is exempt.
pub(crate) fn split_trailing_slash(path: &str) -> (&str, bool) {
    if path.len() > 1 && path.ends_with('/') {
        (&path[..path.len() - 1], true)
    } else {
        (path, false)
    }
}
