//! Shared test double for the host server's response sink.

#![allow(dead_code)]

use std::io;

use http::{HeaderMap, StatusCode};
use waymark::{Flusher, Pusher, ResponseWriter};

/// In-memory response sink recording everything the router writes to it.
pub struct TestWriter {
    pub headers: HeaderMap,
    pub statuses: Vec<StatusCode>,
    pub body: Vec<u8>,
    pub flushed: bool,
    pub pushes: Vec<String>,
    capable: bool,
}

impl TestWriter {
    /// A sink that advertises flush and push capabilities.
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
            statuses: Vec::new(),
            body: Vec::new(),
            flushed: false,
            pushes: Vec::new(),
            capable: true,
        }
    }

    /// A sink without optional capabilities.
    pub fn bare() -> Self {
        Self {
            capable: false,
            ..Self::new()
        }
    }

    /// The first status written, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.statuses.first().copied()
    }

    /// A named header's value as text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl ResponseWriter for TestWriter {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_header(&mut self, status: StatusCode) {
        self.statuses.push(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flusher(&mut self) -> Option<&mut dyn Flusher> {
        if self.capable { Some(self) } else { None }
    }

    fn pusher(&mut self) -> Option<&mut dyn Pusher> {
        if self.capable { Some(self) } else { None }
    }
}

impl Flusher for TestWriter {
    fn flush_response(&mut self) {
        self.flushed = true;
    }
}

impl Pusher for TestWriter {
    fn push(&mut self, target: &str, _headers: &HeaderMap) -> io::Result<()> {
        self.pushes.push(target.to_owned());
        Ok(())
    }
}
