//! Router configuration: the options bundle threaded through dispatch.

use std::sync::Arc;

use http::Request;

use crate::error::{BoxError, Error};
use crate::handler::{
    ErrorHandler, Handler, Middleware, PanicHandler, RoundtripObserver, default_error_handler,
    default_panic_handler, noop_handler,
};
use crate::response::{Recorder, ResponseWriter};

/// Options governing a [`Router`](crate::router::Router).
///
/// The defaults match the original behaviour: automatic OPTIONS replies and
/// trailing-slash redirects on, JSON error rendering, quiet (non-verbose)
/// bodies, no middleware and no roundtrip observer.
///
/// ```
/// use waymark::config::Config;
///
/// let config: Config = Config::new()
///     .verbose(true)
///     .redirect_trailing_slash(false);
/// ```
pub struct Config<B = Vec<u8>> {
    pub(crate) verbose: bool,
    pub(crate) handle_options: bool,
    pub(crate) redirect_trailing_slash: bool,
    pub(crate) middleware: Vec<Middleware<B>>,
    pub(crate) error_handler: ErrorHandler<B>,
    pub(crate) panic_handler: PanicHandler<B>,
    pub(crate) options_handler: Handler<B>,
    pub(crate) roundtrip_observer: Option<RoundtripObserver<B>>,
}

impl<B: 'static> Default for Config<B> {
    fn default() -> Self {
        Self {
            verbose: false,
            handle_options: true,
            redirect_trailing_slash: true,
            middleware: Vec::new(),
            error_handler: Arc::new(default_error_handler::<B>),
            panic_handler: Arc::new(default_panic_handler::<B>),
            options_handler: Arc::new(noop_handler::<B>),
            roundtrip_observer: None,
        }
    }
}

impl<B: 'static> Config<B> {
    /// The default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, error responses include a `debug` field carrying the
    /// cause's string form.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Toggles automatic `OPTIONS` responses and the inclusion of `OPTIONS`
    /// in `Allow` headers. On by default.
    pub fn handle_options(mut self, handle_options: bool) -> Self {
        self.handle_options = handle_options;
        self
    }

    /// Toggles 307/308 trailing-slash redirects. On by default.
    pub fn redirect_trailing_slash(mut self, redirect: bool) -> Self {
        self.redirect_trailing_slash = redirect;
        self
    }

    /// Appends a global middleware. Global middleware wrap every route,
    /// outermost-first in the order they were added.
    pub fn middleware<M>(mut self, middleware: M) -> Self
    where
        M: Fn(Handler<B>) -> Handler<B> + Send + Sync + 'static,
    {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Replaces the error handler invoked for handler errors and routing
    /// misses.
    pub fn error_handler<H>(mut self, handler: H) -> Self
    where
        H: Fn(&mut dyn ResponseWriter, &Request<B>, bool, Error) + Send + Sync + 'static,
    {
        self.error_handler = Arc::new(handler);
        self
    }

    /// Replaces the panic handler.
    pub fn panic_handler<H>(mut self, handler: H) -> Self
    where
        H: Fn(&mut dyn ResponseWriter, &Request<B>, bool, &(dyn std::any::Any + Send))
            + Send
            + Sync
            + 'static,
    {
        self.panic_handler = Arc::new(handler);
        self
    }

    /// Replaces the handler used for automatic `OPTIONS` responses.
    pub fn options_handler<H>(mut self, handler: H) -> Self
    where
        H: Fn(&mut dyn ResponseWriter, &mut Request<B>) -> Result<(), BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.options_handler = Arc::new(handler);
        self
    }

    /// Installs an observer called after every dispatch with the response
    /// recorder and the request.
    pub fn roundtrip_observer<O>(mut self, observer: O) -> Self
    where
        O: Fn(&Recorder<'_>, &Request<B>) + Send + Sync + 'static,
    {
        self.roundtrip_observer = Some(Arc::new(observer));
        self
    }
}
