//! The response sink abstraction and the recorder wrapped around it on every
//! dispatch.
//!
//! The router never talks to a socket itself; the host server hands it
//! something implementing [`ResponseWriter`]. The [`Recorder`] sits in front
//! of that sink to capture the status line, the byte count and the wall-clock
//! latency for the roundtrip observer, while forwarding everything —
//! including the optional flush/push capabilities — to the delegate.

use std::io;
use std::time::{Duration, Instant};

use http::{HeaderMap, StatusCode};

/// Optional capability: a sink that can flush buffered data to the client.
pub trait Flusher {
    /// Sends any buffered response data to the client.
    fn flush_response(&mut self);
}

/// Optional capability: a sink that supports HTTP/2 server push.
pub trait Pusher {
    /// Initiates a server push for `target` with the given request headers.
    fn push(&mut self, target: &str, headers: &HeaderMap) -> io::Result<()>;
}

/// Destination for a handler's response.
///
/// Headers may be mutated freely until [`write_header`](Self::write_header)
/// is called; the first body write on a sink that never saw an explicit
/// status implies `200 OK`.
pub trait ResponseWriter {
    /// The response headers, mutable until the header block is written.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Writes the status line and header block.
    fn write_header(&mut self, status: StatusCode);

    /// Writes a chunk of the response body, returning the bytes accepted.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// The sink's flush capability, if it has one.
    fn flusher(&mut self) -> Option<&mut dyn Flusher> {
        None
    }

    /// The sink's server-push capability, if it has one.
    fn pusher(&mut self) -> Option<&mut dyn Pusher> {
        None
    }
}

/// Instrumenting wrapper around the host's response sink.
///
/// Records the first status written (explicitly or implied by a body write),
/// the cumulative number of body bytes accepted by the delegate, and the time
/// elapsed since construction. All calls are forwarded; only the first status
/// is recorded.
pub struct Recorder<'a> {
    delegate: &'a mut dyn ResponseWriter,
    start: Instant,
    status: Option<StatusCode>,
    size: usize,
}

impl<'a> Recorder<'a> {
    /// Wraps `delegate`, starting the latency clock.
    pub fn new(delegate: &'a mut dyn ResponseWriter) -> Self {
        Self {
            delegate,
            start: Instant::now(),
            status: None,
            size: 0,
        }
    }

    /// The recorded status, or `200 OK` when no explicit status was written.
    pub fn status_code(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    /// Total number of body bytes the delegate accepted.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Wall-clock time since the recorder was created.
    pub fn latency(&self) -> Duration {
        self.start.elapsed()
    }
}

impl ResponseWriter for Recorder<'_> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.delegate.headers_mut()
    }

    fn write_header(&mut self, status: StatusCode) {
        if self.status.is_none() {
            self.status = Some(status);
        }
        self.delegate.write_header(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        let written = self.delegate.write(buf)?;
        self.size += written;
        Ok(written)
    }

    fn flusher(&mut self) -> Option<&mut dyn Flusher> {
        self.delegate.flusher()
    }

    fn pusher(&mut self) -> Option<&mut dyn Pusher> {
        self.delegate.pusher()
    }
}
