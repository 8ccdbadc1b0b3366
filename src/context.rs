//! Request-scoped route data.
//!
//! The dispatcher attaches a [`RouteData`] to every request's extensions
//! before the handler runs, so handlers and middleware can ask which pattern
//! matched and what the wildcard segments captured.

use http::Request;

use crate::types::Params;

/// The matched pattern and its captured parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteData {
    /// The registered pattern, verbatim (e.g. `/greet/:name`). Empty when no
    /// route matched.
    pub route: String,
    /// Captured parameters, keyed by the names declared in the pattern.
    pub params: Params,
}

/// The route data attached to `req`, if the request went through dispatch.
pub fn route_data<B>(req: &Request<B>) -> Option<&RouteData> {
    req.extensions().get::<RouteData>()
}

/// The matched pattern for `req`.
pub fn get_route<B>(req: &Request<B>) -> Option<&str> {
    route_data(req).map(|data| data.route.as_str())
}

/// The captured parameters for `req`.
pub fn get_params<B>(req: &Request<B>) -> Option<&Params> {
    route_data(req).map(|data| &data.params)
}
