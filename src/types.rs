//! Shared type definitions: parsed pattern segments, captured parameters and
//! the outcome of a route-table lookup.

use ahash::AHashMap;
use http::{Method, StatusCode};

use crate::context::RouteData;

/// One token of a parsed route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matched by byte equality against the request path.
    Literal(String),
    /// `:name` — matches a non-empty run of bytes up to the next `/`.
    Param(String),
    /// `*name` — consumes the remainder of the path; only valid as the final
    /// segment.
    CatchAll(String),
}

/// Captured path parameters, keyed by the names declared in the pattern.
/// An unnamed catch-all is exposed under `"*"`.
pub type Params = AHashMap<String, String>;

/// Outcome of [`Router::lookup`](crate::router::Router::lookup).
///
/// Exactly one of the following shapes is produced for any request:
///
/// - `200` with a handler: a normal hit.
/// - `308`/`307` with `location`: trailing-slash redirect (308 for GET,
///   307 otherwise).
/// - `405` with `allow`: the path exists but the method is not registered.
/// - `404`: full miss.
///
/// An automatic OPTIONS response is a `200` carrying both the configured
/// OPTIONS handler and an `allow` list.
pub struct Lookup<T> {
    /// Status the dispatcher should act on.
    pub status: StatusCode,
    /// The matched handler, present only for hits.
    pub handler: Option<T>,
    /// Matched pattern and captured parameters; empty on a full miss.
    pub route_data: RouteData,
    /// Methods to advertise via `Allow` (405 and automatic OPTIONS).
    pub allow: Option<Vec<Method>>,
    /// Redirect target for 307/308.
    pub location: Option<String>,
}
