//! Handler and middleware shapes, plus the default cross-cutting handlers
//! the router falls back to when none are configured.

use std::any::Any;
use std::sync::Arc;

use http::header::CONTENT_TYPE;
use http::{HeaderValue, Method, Request, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::{BoxError, Error};
use crate::response::{Recorder, ResponseWriter};

/// A request handler: writes the response itself and returns `Ok(())`, or
/// returns an error for the configured error handler to render.
pub type Handler<B> =
    Arc<dyn Fn(&mut dyn ResponseWriter, &mut Request<B>) -> Result<(), BoxError> + Send + Sync>;

/// A middleware: a function from handler to handler. The chain is wrapped
/// right-to-left at registration, so the first middleware in the list runs
/// first on the way in.
pub type Middleware<B> = Arc<dyn Fn(Handler<B>) -> Handler<B> + Send + Sync>;

/// Renders a structured [`Error`] as a response. The `bool` is the verbose
/// flag; when set, renderers may expose the error's cause.
pub type ErrorHandler<B> =
    Arc<dyn Fn(&mut dyn ResponseWriter, &Request<B>, bool, Error) + Send + Sync>;

/// Renders a response after a handler panic. Receives the panic payload.
pub type PanicHandler<B> =
    Arc<dyn Fn(&mut dyn ResponseWriter, &Request<B>, bool, &(dyn Any + Send)) + Send + Sync>;

/// Called once per dispatch, after the response is complete, with the
/// recorder's captured status/size/latency.
pub type RoundtripObserver<B> = Arc<dyn Fn(&Recorder<'_>, &Request<B>) + Send + Sync>;

/// Body of every router-rendered error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub message: String,
    /// The underlying cause, present only in verbose mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<String>,
}

/// Handler that succeeds without touching the response. The default handler
/// for automatic `OPTIONS` replies.
pub fn noop_handler<B>(
    _w: &mut dyn ResponseWriter,
    _req: &mut Request<B>,
) -> Result<(), BoxError> {
    Ok(())
}

/// Default error renderer: the error's status plus a JSON body
/// `{"message", "debug"?}`. Methods that must not carry a body (`HEAD`,
/// `PUT`, `TRACE`) get the status line only.
pub fn default_error_handler<B>(
    w: &mut dyn ResponseWriter,
    req: &Request<B>,
    verbose: bool,
    err: Error,
) {
    let method = req.method();
    if method == Method::HEAD || method == Method::PUT || method == Method::TRACE {
        w.write_header(err.status);
        return;
    }

    w.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    w.write_header(err.status);

    let debug = if verbose {
        err.cause.as_ref().map(|cause| cause.to_string())
    } else {
        None
    };
    let body = ErrorResponse {
        message: err.message,
        debug,
    };
    if let Ok(buf) = serde_json::to_vec(&body) {
        let _ = w.write(&buf);
    }
}

/// Default panic renderer: plain 500 with the canonical message, regardless
/// of what the handler panicked with.
pub fn default_panic_handler<B>(
    w: &mut dyn ResponseWriter,
    _req: &Request<B>,
    _verbose: bool,
    _panic_value: &(dyn Any + Send),
) {
    w.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    w.write_header(StatusCode::INTERNAL_SERVER_ERROR);

    let body = ErrorResponse {
        message: StatusCode::INTERNAL_SERVER_ERROR
            .canonical_reason()
            .unwrap_or("")
            .to_owned(),
        debug: None,
    };
    if let Ok(buf) = serde_json::to_vec(&body) {
        let _ = w.write(&buf);
    }
}

/// Writes `body` as a JSON response with the given status.
pub fn json_response(
    w: &mut dyn ResponseWriter,
    status: StatusCode,
    body: &impl Serialize,
) -> Result<(), BoxError> {
    w.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    w.write_header(status);
    let buf = serde_json::to_vec(body)?;
    w.write(&buf)?;
    Ok(())
}

/// Ready-made roundtrip observer that emits one `tracing` event per
/// dispatch with the recorder's captured fields.
pub fn log_roundtrip<B>(recorder: &Recorder<'_>, req: &Request<B>) {
    tracing::info!(
        method = %req.method(),
        path = %req.uri().path(),
        status = recorder.status_code().as_u16(),
        bytes = recorder.size(),
        latency_us = recorder.latency().as_micros() as u64,
        "http request"
    );
}

/// Best-effort rendering of a panic payload for logging.
pub(crate) fn panic_message(panic_value: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic_value.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic_value.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
