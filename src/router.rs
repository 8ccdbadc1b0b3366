//! The route table and the dispatch pipeline around it.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use http::header::{ALLOW, LOCATION};
use http::{HeaderValue, Method, Request, StatusCode};
use parking_lot::RwLock;
use tracing::{debug, error};

use crate::config::Config;
use crate::context::RouteData;
use crate::error::{BoxError, Error, RouteError};
use crate::handler::{Handler, Middleware, panic_message};
use crate::operations;
use crate::operations::util::split_trailing_slash;
use crate::response::{Recorder, ResponseWriter};
use crate::tree::{Leaf, Node};
use crate::types::{Lookup, Params};

/// An HTTP request router.
///
/// Routes are registered up front (registration takes `&self`, guarded by a
/// lock) and then looked up on every request; lookups never mutate the tree.
/// The contract is the usual one: register every route before serving the
/// first request.
///
/// `B` is the request body type. The router never reads the body; it only
/// threads the request through to handlers.
pub struct Router<B = Vec<u8>> {
    root: RwLock<Node<Handler<B>>>,
    config: Config<B>,
}

impl<B: 'static> Default for Router<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: 'static> Router<B> {
    /// A router with the default [`Config`].
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// A router with a custom [`Config`].
    pub fn with_config(config: Config<B>) -> Self {
        Self {
            root: RwLock::new(Node::new(Vec::new())),
            config,
        }
    }

    /// Registers `handler` for `method` requests matching `pattern`.
    ///
    /// Pattern syntax: literal segments (`/users`), single-segment parameters
    /// (`/users/:id`) and a terminal catch-all (`/static/*path`). A trailing
    /// `/` is significant: it selects which side of the trailing-slash
    /// redirect this route lives on.
    pub fn handle<H>(&self, method: Method, pattern: &str, handler: H) -> Result<(), RouteError>
    where
        H: Fn(&mut dyn ResponseWriter, &mut Request<B>) -> Result<(), BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.handle_with(method, pattern, handler, &[])
    }

    /// Like [`handle`](Self::handle), with per-route middleware.
    ///
    /// The effective chain is global middleware followed by `middleware`,
    /// wrapped right-to-left: the first global middleware is outermost and
    /// runs first on the way in.
    pub fn handle_with<H>(
        &self,
        method: Method,
        pattern: &str,
        handler: H,
        middleware: &[Middleware<B>],
    ) -> Result<(), RouteError>
    where
        H: Fn(&mut dyn ResponseWriter, &mut Request<B>) -> Result<(), BoxError>
            + Send
            + Sync
            + 'static,
    {
        let mut composed: Handler<B> = Arc::new(handler);
        for wrap in self.config.middleware.iter().chain(middleware).rev() {
            composed = wrap(composed);
        }

        operations::insert(&mut self.root.write(), method.clone(), pattern, composed)?;
        debug!(%method, pattern, "registered route");
        Ok(())
    }

    /// Registers an infallible handler: one that always writes its own
    /// response and has no error to return.
    pub fn handle_fn<H>(&self, method: Method, pattern: &str, handler: H) -> Result<(), RouteError>
    where
        H: Fn(&mut dyn ResponseWriter, &mut Request<B>) + Send + Sync + 'static,
    {
        self.handle(
            method,
            pattern,
            move |w: &mut dyn ResponseWriter, req: &mut Request<B>| {
                handler(w, req);
                Ok(())
            },
        )
    }

    /// Resolves `(method, path)` against the route table.
    ///
    /// Always produces exactly one of hit, redirect, method-not-allowed or
    /// not-found; see [`Lookup`].
    pub fn lookup(&self, method: &Method, path: &str) -> Lookup<Handler<B>> {
        let (trimmed, had_slash) = split_trailing_slash(path);
        let search_path = trimmed.strip_prefix('/').unwrap_or(trimmed);

        let root = self.root.read();
        let hit = operations::search(&root, search_path.as_bytes());
        let Some((node, captures)) = hit else {
            debug!(%method, path, "no route matched");
            return Lookup {
                status: StatusCode::NOT_FOUND,
                handler: None,
                route_data: RouteData::default(),
                allow: None,
                location: None,
            };
        };
        let Some(leaf) = node.leaf.as_ref() else {
            // search only ever returns terminals
            return Lookup {
                status: StatusCode::NOT_FOUND,
                handler: None,
                route_data: RouteData::default(),
                allow: None,
                location: None,
            };
        };

        let route_data = RouteData {
            route: leaf.route.clone(),
            params: pair_params(leaf, &captures, had_slash),
        };

        // A slash mismatch means the route only exists in the other form.
        // With redirects on the canonical URL wins over the method check:
        // redirect first, let the retried request produce any 405.
        if !leaf.is_catchall && had_slash != leaf.add_slash {
            if self.config.redirect_trailing_slash {
                let location = if leaf.add_slash {
                    format!("{path}/")
                } else {
                    trimmed.to_owned()
                };
                let status = if *method == Method::GET {
                    StatusCode::PERMANENT_REDIRECT
                } else {
                    StatusCode::TEMPORARY_REDIRECT
                };
                debug!(%method, path, location, "trailing slash redirect");
                return Lookup {
                    status,
                    handler: None,
                    route_data,
                    allow: None,
                    location: Some(location),
                };
            }

            debug!(%method, path, "no route matched (trailing slash mismatch)");
            return Lookup {
                status: StatusCode::NOT_FOUND,
                handler: None,
                route_data: RouteData::default(),
                allow: None,
                location: None,
            };
        }

        if let Some(handler) = leaf.handlers.get(method) {
            return Lookup {
                status: StatusCode::OK,
                handler: Some(handler.clone()),
                route_data,
                allow: None,
                location: None,
            };
        }

        let allow = self.allowed(leaf);
        if *method == Method::OPTIONS && self.config.handle_options {
            return Lookup {
                status: StatusCode::OK,
                handler: Some(self.config.options_handler.clone()),
                route_data,
                allow: Some(allow),
                location: None,
            };
        }

        debug!(%method, path, "method not allowed");
        Lookup {
            status: StatusCode::METHOD_NOT_ALLOWED,
            handler: None,
            route_data,
            allow: Some(allow),
            location: None,
        }
    }

    /// Runs one request through the pipeline: lookup, recorder, route data,
    /// `Allow` header, handler under panic protection, error translation,
    /// and finally the roundtrip observer.
    pub fn dispatch(&self, w: &mut dyn ResponseWriter, req: &mut Request<B>) {
        let lookup = self.lookup(req.method(), req.uri().path());

        let mut recorder = Recorder::new(w);
        req.extensions_mut().insert(lookup.route_data.clone());

        if let Some(methods) = &lookup.allow {
            if let Ok(value) = HeaderValue::from_str(&join_methods(methods)) {
                recorder.headers_mut().insert(ALLOW, value);
            }
        }

        if let Some(location) = &lookup.location {
            if let Ok(value) = HeaderValue::from_str(location) {
                recorder.headers_mut().insert(LOCATION, value);
            }
            recorder.write_header(lookup.status);
        } else if let Some(handler) = &lookup.handler {
            self.invoke(handler, &mut recorder, req);
        } else {
            let err = Error::new(lookup.status).operational();
            (self.config.error_handler)(&mut recorder, req, self.config.verbose, err);
        }

        if let Some(observer) = &self.config.roundtrip_observer {
            observer(&recorder, req);
        }
    }

    /// A human-readable rendering of the route tree, for debugging.
    pub fn dump(&self) -> String {
        operations::dump(&self.root.read())
    }

    fn invoke(&self, handler: &Handler<B>, recorder: &mut Recorder<'_>, req: &mut Request<B>) {
        let outcome = catch_unwind(AssertUnwindSafe(|| handler(&mut *recorder, &mut *req)));
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                let err = Error::coerce(err);
                if err.operational {
                    debug!(status = err.status.as_u16(), %err, "handler error");
                } else {
                    error!(status = err.status.as_u16(), %err, "handler error");
                }
                (self.config.error_handler)(recorder, req, self.config.verbose, err);
            }
            Err(panic_value) => {
                error!(panic = panic_message(panic_value.as_ref()), "handler panicked");
                (self.config.panic_handler)(
                    recorder,
                    req,
                    self.config.verbose,
                    panic_value.as_ref(),
                );
            }
        }
    }

    fn allowed(&self, leaf: &Leaf<Handler<B>>) -> Vec<Method> {
        let mut methods: Vec<Method> = leaf.handlers.keys().cloned().collect();
        if self.config.handle_options && !methods.contains(&Method::OPTIONS) {
            methods.push(Method::OPTIONS);
        }
        methods
    }
}

macro_rules! method_helpers {
    ($( $(#[$doc:meta])* $name:ident => $method:ident ),* $(,)?) => {
        impl<B: 'static> Router<B> {
            $(
                $(#[$doc])*
                pub fn $name<H>(&self, pattern: &str, handler: H) -> Result<(), RouteError>
                where
                    H: Fn(&mut dyn ResponseWriter, &mut Request<B>) -> Result<(), BoxError>
                        + Send
                        + Sync
                        + 'static,
                {
                    self.handle(Method::$method, pattern, handler)
                }
            )*
        }
    };
}

method_helpers! {
    /// Registers a handler for `GET` requests.
    get => GET,
    /// Registers a handler for `POST` requests.
    post => POST,
    /// Registers a handler for `PUT` requests.
    put => PUT,
    /// Registers a handler for `DELETE` requests.
    delete => DELETE,
    /// Registers a handler for `PATCH` requests.
    patch => PATCH,
    /// Registers a handler for `HEAD` requests.
    head => HEAD,
    /// Registers a handler for `OPTIONS` requests.
    options => OPTIONS,
}

/// Joins methods for the `Allow` header: `GET, OPTIONS`.
fn join_methods(methods: &[Method]) -> String {
    methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Pairs the reverse-ordered captures with the terminal's parameter names.
/// A stripped trailing slash is restored into a catch-all's capture, which
/// is always the deepest (first) one.
fn pair_params<T>(leaf: &Leaf<T>, captures: &[&[u8]], had_slash: bool) -> Params {
    let names = &leaf.param_names;
    assert!(
        names.len() == captures.len(),
        "captured {} values for {} parameter names in '{}'",
        captures.len(),
        names.len(),
        leaf.route,
    );

    let mut params = Params::with_capacity(names.len());
    let count = names.len();
    for (i, raw) in captures.iter().enumerate() {
        let mut value = String::from_utf8_lossy(raw).into_owned();
        if i == 0 && leaf.is_catchall && had_slash {
            value.push('/');
        }
        params.insert(names[count - 1 - i].clone(), value);
    }
    params
}
