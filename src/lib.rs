//! # waymark
//!
//! waymark is an HTTP request router for Rust: it matches a request's method
//! and path against a registered route table, exposes captured path
//! parameters to the handler, and wraps handler execution with the
//! cross-cutting concerns a server needs anyway (error translation, panic
//! recovery, middleware composition, response instrumentation, automatic
//! OPTIONS replies and trailing-slash redirects).
//!
//! Matching is backed by a compressed radix tree with three segment kinds —
//! literals, single-segment parameters (`/users/:id`) and terminal
//! catch-alls (`/static/*path`) — with a deterministic priority order:
//! static beats param beats catch-all, and busier static branches are probed
//! first.
//!
//! ## Features
//!
//! - Static, parameterized and catch-all route matching with backtracking.
//! - Method-aware lookups that distinguish 404 from 405 (with `Allow`).
//! - 307/308 trailing-slash redirects and automatic OPTIONS responses.
//! - A dispatch pipeline with middleware, structured errors, panic recovery
//!   and per-request response instrumentation.
//! - Structured logging with `tracing`, JSON error bodies with `serde_json`.
//!
//! ## Example
//!
//! ```rust
//! use http::{Method, StatusCode};
//! use waymark::{ResponseWriter, Router};
//!
//! let router: Router = Router::new();
//!
//! router
//!     .get("/greet/:name", |w, _req| {
//!         w.write_header(StatusCode::OK);
//!         Ok(())
//!     })
//!     .expect("failed to add /greet/:name");
//!
//! let hit = router.lookup(&Method::GET, "/greet/fry");
//! assert_eq!(hit.status, StatusCode::OK);
//! assert_eq!(hit.route_data.route, "/greet/:name");
//! assert_eq!(hit.route_data.params["name"], "fry");
//!
//! // Lookups distinguish a missing route from a missing method.
//! let miss = router.lookup(&Method::POST, "/greet/fry");
//! assert_eq!(miss.status, StatusCode::METHOD_NOT_ALLOWED);
//! let miss = router.lookup(&Method::GET, "/nope");
//! assert_eq!(miss.status, StatusCode::NOT_FOUND);
//! ```
//!
//! Serving requests means handing the router a response sink implementing
//! [`ResponseWriter`] and calling [`Router::dispatch`]; the host HTTP server
//! owns the socket loop and the body plumbing.

pub mod config;
pub mod context;
pub mod error;
pub mod handler;
pub mod response;
pub mod router;
pub mod types;

mod operations;
mod tree;

pub use config::Config;
pub use context::{RouteData, get_params, get_route, route_data};
pub use error::{BoxError, Error, RouteError};
pub use handler::{ErrorResponse, Handler, Middleware, json_response, log_roundtrip};
pub use response::{Flusher, Pusher, Recorder, ResponseWriter};
pub use router::Router;
pub use types::{Lookup, Params, Segment};
