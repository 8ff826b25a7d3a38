//! Per-connection request lifecycle.

use log::{debug, trace};

use crate::conn::status::HttpStatus;
use crate::parser::{Error, HttpRequest, ParseState, ParserLimits, RequestParser};

/// The connection-owned half of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    /// Bytes are flowing into the parser.
    Receiving,
    /// A completed request was handed off; its response is in flight.
    Responding,
    /// The transport is gone, or the server gave up on the connection.
    Closed,
}

/// One connection's worth of request parsing and lifecycle.
///
/// Wraps a [`RequestParser`] with the phases the parser must not know about:
/// response transmission and teardown. The server loop feeds bytes as they
/// arrive, takes each completed request, reports when its response has been
/// written, and signals end-of-stream when the transport closes. Requests
/// pipelined behind the current one wait in the parser's residue and are
/// picked up, in arrival order, as each response is reported sent.
///
/// # Examples
///
/// ```
/// use feedhttp_rs::{Connection, HttpStatus};
///
/// let mut conn = Connection::new();
/// conn.feed(b"GET /a HTTP/1.1\r\nHost: x\r\n\r\n");
/// assert_eq!(conn.status(), HttpStatus::SendingResponse);
///
/// let request = conn.take_request().unwrap();
/// assert_eq!(request.target, "/a");
///
/// conn.response_sent();
/// assert_eq!(conn.status(), HttpStatus::Pending);
/// ```
#[derive(Debug)]
pub struct Connection {
    parser: RequestParser,
    lifecycle: Lifecycle,
    eof: bool,
    /// Requests completed on this connection, for log context.
    served: u64,
}

impl Connection {
    /// Create a connection with the default [`ParserLimits`].
    pub fn new() -> Self {
        Self::with_limits(ParserLimits::default())
    }

    /// Create a connection with explicit parser limits.
    pub fn with_limits(limits: ParserLimits) -> Self {
        Self {
            parser: RequestParser::with_limits(limits),
            lifecycle: Lifecycle::Receiving,
            eof: false,
            served: 0,
        }
    }

    /// Append newly read bytes. Ignored once the connection is closed.
    pub fn feed(&mut self, bytes: &[u8]) {
        if self.lifecycle == Lifecycle::Closed {
            return;
        }
        self.parser.feed(bytes);
    }

    /// The connection's overall disposition.
    pub fn status(&self) -> HttpStatus {
        match self.lifecycle {
            Lifecycle::Closed => HttpStatus::Closed,
            Lifecycle::Responding => HttpStatus::SendingResponse,
            Lifecycle::Receiving => match self.parser.state() {
                ParseState::RequestLine => HttpStatus::Pending,
                ParseState::Headers => HttpStatus::ParsingHeaders,
                ParseState::Body => HttpStatus::ParsingBody,
                ParseState::Complete => HttpStatus::SendingResponse,
                ParseState::Failed => HttpStatus::Error,
            },
        }
    }

    /// The parse error behind an [`HttpStatus::Error`] status.
    pub fn error(&self) -> Option<&Error> {
        self.parser.error()
    }

    /// The request being parsed, possibly still partial.
    pub fn request(&self) -> &HttpRequest {
        self.parser.request()
    }

    /// Hand off the completed request and start responding to it.
    ///
    /// Returns `None` until the parser has a complete request. On success the
    /// connection moves to [`HttpStatus::SendingResponse`] until
    /// [`response_sent`](Self::response_sent) is called.
    pub fn take_request(&mut self) -> Option<HttpRequest> {
        if self.lifecycle != Lifecycle::Receiving {
            return None;
        }
        let request = self.parser.take_request()?;
        self.lifecycle = Lifecycle::Responding;
        self.served += 1;
        debug!(
            "request #{n} ready: {method} {target}",
            n = self.served,
            method = request.method,
            target = request.target
        );
        Some(request)
    }

    /// The response has been fully written; begin the next request.
    ///
    /// Residual bytes already received feed the fresh request immediately, so
    /// a fully pipelined request completes during this call. After
    /// end-of-stream no further request can arrive and the connection closes
    /// instead.
    pub fn response_sent(&mut self) {
        if self.lifecycle != Lifecycle::Responding {
            return;
        }
        if self.eof {
            self.close();
            return;
        }
        trace!("response sent, recycling parser for the next request");
        self.lifecycle = Lifecycle::Receiving;
        self.parser.reset();
    }

    /// End-of-stream notification from the transport.
    ///
    /// A clean close between requests moves straight to
    /// [`HttpStatus::Closed`]; a request cut off mid-flight fails with
    /// [`Error::UnexpectedConnectionClose`]. A request that completed before
    /// the close stays available for handoff; the connection closes once its
    /// response is reported sent.
    pub fn finish(&mut self) {
        if self.lifecycle == Lifecycle::Closed {
            return;
        }
        self.eof = true;
        if self.lifecycle == Lifecycle::Receiving {
            if self.parser.is_idle() {
                self.close();
            } else {
                self.parser.finish();
            }
        }
    }

    /// Drop the connection, whatever its state.
    pub fn close(&mut self) {
        if self.lifecycle != Lifecycle::Closed {
            debug!("connection closed after {n} requests", n = self.served);
            self.lifecycle = Lifecycle::Closed;
        }
    }

    /// Whether the connection has been closed.
    pub fn is_closed(&self) -> bool {
        self.lifecycle == Lifecycle::Closed
    }
}

impl Default for Connection {
    fn default() -> Self {
        Self::new()
    }
}
