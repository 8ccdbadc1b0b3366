//! Defines the error types used throughout the `waymark` crate.
//!
//! There are two distinct families: [`RouteError`] for registration-time
//! failures (programmer errors, surfaced at startup) and [`Error`] for the
//! structured HTTP error value that handlers return and error handlers render.

use std::error::Error as StdError;

use http::{Method, StatusCode};
use thiserror::Error;

/// Boxed error type accepted from handlers. Anything that is not already an
/// [`Error`] gets wrapped as a 500 with the original as its cause.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Errors raised while registering a route. These cannot occur at request
/// time if registration succeeded; callers typically `expect` them during
/// application startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The route pattern was empty.
    #[error("route pattern is empty")]
    EmptyPattern,

    /// The route pattern did not begin with `/`.
    #[error("route pattern '{pattern}' must begin with '/'")]
    MissingLeadingSlash {
        /// The offending pattern.
        pattern: String,
    },

    /// A catch-all segment appeared anywhere but the final position.
    #[error("catch-all segment in '{pattern}' must be the final segment")]
    CatchAllNotLast {
        /// The offending pattern.
        pattern: String,
    },

    /// A handler for this method is already registered at the pattern's
    /// terminal.
    #[error("a {method} handler is already registered for '{pattern}'")]
    DuplicateMethod {
        /// The HTTP method that was registered twice.
        method: Method,
        /// The pattern whose terminal already carries the method.
        pattern: String,
    },

    /// A segment of the pattern could not be interpreted.
    #[error("invalid segment '{segment}': {reason}")]
    InvalidSegment {
        /// The problematic segment.
        segment: String,
        /// Why the segment is invalid.
        reason: String,
    },
}

/// Structured error carried from a handler to the error handler.
///
/// `status` drives the response status line, `message` the rendered body.
/// `operational` marks errors the router synthesizes itself (404, 405) so
/// observers can suppress routine noise.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    /// HTTP status to respond with.
    pub status: StatusCode,
    /// Human-readable message; defaults to the status' canonical reason.
    pub message: String,
    /// Optional underlying cause, exposed as `debug` in verbose responses.
    #[source]
    pub cause: Option<BoxError>,
    /// True for errors synthesized by the router itself.
    pub operational: bool,
}

impl Error {
    /// Constructs an error for `status` with its canonical reason as the
    /// message.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            message: status.canonical_reason().unwrap_or("").to_owned(),
            cause: None,
            operational: false,
        }
    }

    /// Replaces the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attaches an underlying cause.
    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Flags the error as operational (router-synthesized, expected noise).
    pub fn operational(mut self) -> Self {
        self.operational = true;
        self
    }

    /// Coerces a boxed handler error into a structured [`Error`].
    ///
    /// An [`Error`] passes through unchanged; anything else becomes a 500
    /// with the original as cause.
    pub fn coerce(err: BoxError) -> Self {
        match err.downcast::<Error>() {
            Ok(err) => *err,
            Err(other) => Self::new(StatusCode::INTERNAL_SERVER_ERROR).with_cause(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_canonical_reason() {
        let err = Error::new(StatusCode::NOT_FOUND);
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Not Found");
        assert!(err.cause.is_none());
        assert!(!err.operational);
    }

    #[test]
    fn coerce_passes_structured_errors_through() {
        let original = Error::new(StatusCode::FORBIDDEN).with_message("forbidden");
        let coerced = Error::coerce(Box::new(original));
        assert_eq!(coerced.status, StatusCode::FORBIDDEN);
        assert_eq!(coerced.message, "forbidden");
    }

    #[test]
    fn coerce_wraps_foreign_errors_as_internal() {
        let io_err = std::io::Error::other("disk on fire");
        let coerced = Error::coerce(Box::new(io_err));
        assert_eq!(coerced.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(coerced.message, "Internal Server Error");
        assert_eq!(coerced.cause.unwrap().to_string(), "disk on fire");
    }
}
