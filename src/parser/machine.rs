//! The incremental request-parsing state machine.

use log::{debug, trace};

use crate::parser::body::{parse_chunk_size, BodyFraming, ChunkPhase};
use crate::parser::error::Error;
use crate::parser::headers::HeaderMap;
use crate::parser::limits::ParserLimits;
use crate::parser::method::Method;
use crate::parser::request::HttpRequest;
use crate::parser::scan::ScanBuffer;
use crate::parser::version::HttpVersion;

/// Parser-internal phase.
///
/// The state only moves forward: `RequestLine` → `Headers` → `Body` →
/// `Complete`, or to `Failed` from any non-terminal phase. Connection-owned
/// phases (response transmission, teardown) live in
/// [`Connection`](crate::conn::Connection), not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Waiting for or scanning the request line.
    RequestLine,
    /// Scanning header lines.
    Headers,
    /// Decoding the message body.
    Body,
    /// A full request is ready for handoff.
    Complete,
    /// A terminal protocol error was found.
    Failed,
}

/// Incremental HTTP/1.x request parser.
///
/// Feed it whatever bytes the transport produced; it advances as far as the
/// data allows and resumes exactly where it stopped on the next call. A read
/// boundary may fall anywhere — mid-method, mid-header-name, mid-chunk-size —
/// without losing data. `feed` never panics and never returns an error;
/// failures surface only through [`state`](Self::state) and
/// [`error`](Self::error), so the caller decides the connection's fate
/// synchronously.
///
/// # Examples
///
/// ```
/// use feedhttp_rs::{ParseState, RequestParser};
///
/// let mut parser = RequestParser::new();
/// parser.feed(b"GET /index.html HTT");
/// assert_eq!(parser.state(), ParseState::RequestLine);
///
/// parser.feed(b"P/1.1\r\nHost: example.com\r\n\r\n");
/// assert_eq!(parser.state(), ParseState::Complete);
///
/// let request = parser.take_request().unwrap();
/// assert_eq!(request.target, "/index.html");
/// ```
#[derive(Debug)]
pub struct RequestParser {
    buf: ScanBuffer,
    state: ParseState,
    request: HttpRequest,
    framing: BodyFraming,
    chunk: ChunkPhase,
    header_bytes: usize,
    error: Option<Error>,
    limits: ParserLimits,
    taken: bool,
}

impl RequestParser {
    /// Create a parser with the default [`ParserLimits`].
    pub fn new() -> Self {
        Self::with_limits(ParserLimits::default())
    }

    /// Create a parser with explicit limits.
    pub fn with_limits(limits: ParserLimits) -> Self {
        Self {
            buf: ScanBuffer::default(),
            state: ParseState::RequestLine,
            request: HttpRequest::default(),
            framing: BodyFraming::None,
            chunk: ChunkPhase::Size,
            header_bytes: 0,
            error: None,
            limits,
            taken: false,
        }
    }

    /// Append newly read bytes and advance as far as the data allows.
    ///
    /// Bytes must arrive in stream order. Input fed after a failure is
    /// dropped; input fed after completion is buffered untouched as the
    /// residue of the next pipelined request.
    pub fn feed(&mut self, bytes: &[u8]) {
        match self.state {
            ParseState::Failed => {}
            ParseState::Complete => self.buf.push(bytes),
            _ => {
                self.buf.push(bytes);
                self.advance();
            }
        }
    }

    /// End-of-stream notification from the transport.
    ///
    /// A request still in flight fails with
    /// [`Error::UnexpectedConnectionClose`]; a partial body is never promoted
    /// to a complete one.
    pub fn finish(&mut self) {
        match self.state {
            ParseState::Complete | ParseState::Failed => {}
            _ => self.fail(Error::UnexpectedConnectionClose),
        }
    }

    /// The current parser phase.
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Whether a complete request is ready for handoff.
    pub fn is_complete(&self) -> bool {
        self.state == ParseState::Complete
    }

    /// The terminal error, once [`state`](Self::state) is
    /// [`ParseState::Failed`].
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Whether nothing of the next request has arrived yet.
    ///
    /// True between pipelined requests; the connection layer uses it to tell
    /// a clean close from a truncated one.
    pub fn is_idle(&self) -> bool {
        self.state == ParseState::RequestLine && self.buf.len() == 0
    }

    /// The request being built, possibly still partial.
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    /// The method, meaningful once the request line has been scanned.
    pub fn method(&self) -> Method {
        self.request.method
    }

    /// The version, meaningful once the request line has been scanned.
    pub fn version(&self) -> HttpVersion {
        self.request.version
    }

    /// The raw request target, meaningful once the request line has been
    /// scanned.
    pub fn target(&self) -> &str {
        &self.request.target
    }

    /// The headers collected so far.
    pub fn headers(&self) -> &HeaderMap {
        &self.request.headers
    }

    /// The body bytes decoded so far.
    pub fn body(&self) -> &[u8] {
        &self.request.body
    }

    /// Unconsumed input: the partial tail of the current message, or the
    /// start of the next pipelined request once this one is complete.
    pub fn residue(&self) -> &[u8] {
        self.buf.remaining()
    }

    /// Move the completed request out, once. Returns `None` while parsing is
    /// still in progress, after a failure, or if the request was already
    /// taken.
    pub fn take_request(&mut self) -> Option<HttpRequest> {
        if self.state != ParseState::Complete || self.taken {
            return None;
        }
        self.taken = true;
        Some(std::mem::take(&mut self.request))
    }

    /// Start over for the next pipelined request, keeping unconsumed input.
    ///
    /// Any residue is scanned immediately, so a request that arrived in full
    /// behind the previous one completes during the reset.
    pub fn reset(&mut self) {
        self.state = ParseState::RequestLine;
        self.request = HttpRequest::default();
        self.framing = BodyFraming::None;
        self.chunk = ChunkPhase::Size;
        self.header_bytes = 0;
        self.error = None;
        self.taken = false;
        self.advance();
    }

    /// Run sub-machines until input runs out or a terminal state is reached.
    fn advance(&mut self) {
        while self.state != ParseState::Complete && self.state != ParseState::Failed {
            let progressed = match self.state {
                ParseState::RequestLine => self.scan_request_line(),
                ParseState::Headers => self.scan_header_line(),
                ParseState::Body => self.decode_body(),
                ParseState::Complete | ParseState::Failed => false,
            };
            if !progressed {
                break;
            }
        }
    }

    fn scan_request_line(&mut self) -> bool {
        let Some(line) = self.buf.next_line() else {
            if self.buf.len() > self.limits.max_request_line_bytes {
                self.fail(Error::RequestTooLarge {
                    what: "request line",
                    limit: self.limits.max_request_line_bytes,
                });
            }
            return false;
        };
        if line.is_empty() {
            // Stray CRLFs between pipelined requests are tolerated.
            return true;
        }
        if line.len() > self.limits.max_request_line_bytes {
            self.fail(Error::RequestTooLarge {
                what: "request line",
                limit: self.limits.max_request_line_bytes,
            });
            return false;
        }

        let text = String::from_utf8_lossy(&line).into_owned();
        let parts: Vec<&str> = text.split_whitespace().collect();
        if parts.len() < 2 || parts.len() > 3 {
            self.fail(Error::MalformedRequestLine(text));
            return false;
        }

        let method_token = parts[0];
        if !is_method_token(method_token) {
            self.fail(Error::InvalidMethodOrVersionGrammar(method_token.to_string()));
            return false;
        }

        let version = match parts.get(2) {
            Some(token) => match classify_version(token) {
                Ok(version) => version,
                Err(err) => {
                    self.fail(err);
                    return false;
                }
            },
            // A bare "METHOD TARGET" line scans, with the version left unknown.
            None => HttpVersion::Unknown,
        };

        self.request.method = Method::from_token(method_token);
        self.request.target = parts[1].to_string();
        self.request.version = version;
        trace!(
            "request line scanned: {} {} {}",
            self.request.method,
            self.request.target,
            self.request.version
        );
        self.state = ParseState::Headers;
        true
    }

    fn scan_header_line(&mut self) -> bool {
        let Some(line) = self.buf.next_line() else {
            if self.header_bytes + self.buf.len() > self.limits.max_header_bytes {
                self.fail(Error::RequestTooLarge {
                    what: "header section",
                    limit: self.limits.max_header_bytes,
                });
            }
            return false;
        };
        self.header_bytes += line.len() + 2;
        if self.header_bytes > self.limits.max_header_bytes {
            self.fail(Error::RequestTooLarge {
                what: "header section",
                limit: self.limits.max_header_bytes,
            });
            return false;
        }
        if line.is_empty() {
            return self.end_of_headers();
        }
        match parse_header_field(&line) {
            Ok((name, value)) => {
                self.request.headers.append(&name, value);
                true
            }
            Err(err) => {
                self.fail(err);
                false
            }
        }
    }

    /// The empty line arrived: fix the body framing and move on.
    fn end_of_headers(&mut self) -> bool {
        let (content_length, chunked) = match framing_from_headers(&self.request.headers) {
            Ok(framing) => framing,
            Err(err) => {
                self.fail(err);
                return false;
            }
        };
        if let Some(length) = content_length {
            if length > self.limits.max_body_bytes {
                self.fail(Error::RequestTooLarge {
                    what: "body",
                    limit: self.limits.max_body_bytes,
                });
                return false;
            }
        }
        self.request.content_length = content_length;
        self.request.chunked = chunked;

        if chunked {
            trace!("headers complete, chunked body follows");
            self.chunk = ChunkPhase::Size;
            self.framing = BodyFraming::Chunked;
            self.state = ParseState::Body;
        } else {
            match content_length {
                Some(length) if length > 0 => {
                    trace!("headers complete, expecting {length} body bytes");
                    self.framing = BodyFraming::Length(length);
                    self.state = ParseState::Body;
                }
                // No framing headers, or a zero-length body: nothing to decode.
                _ => self.complete(),
            }
        }
        true
    }

    fn decode_body(&mut self) -> bool {
        match self.framing {
            BodyFraming::None => {
                self.complete();
                true
            }
            BodyFraming::Length(total) => {
                let needed = total - self.request.body.len();
                let taken = self.buf.take(needed);
                if taken.is_empty() {
                    return false;
                }
                self.request.body.extend_from_slice(&taken);
                if self.request.body.len() == total {
                    self.complete();
                }
                true
            }
            BodyFraming::Chunked => self.decode_chunk(),
        }
    }

    fn decode_chunk(&mut self) -> bool {
        match self.chunk {
            ChunkPhase::Size => {
                let Some(line) = self.buf.next_line() else {
                    if self.buf.len() > self.limits.max_request_line_bytes {
                        self.fail(Error::RequestTooLarge {
                            what: "chunk-size line",
                            limit: self.limits.max_request_line_bytes,
                        });
                    }
                    return false;
                };
                match parse_chunk_size(&line) {
                    Err(err) => {
                        self.fail(err);
                        false
                    }
                    Ok(0) => {
                        self.chunk = ChunkPhase::Trailers;
                        true
                    }
                    Ok(size) => {
                        if self.request.body.len().saturating_add(size)
                            > self.limits.max_body_bytes
                        {
                            self.fail(Error::RequestTooLarge {
                                what: "body",
                                limit: self.limits.max_body_bytes,
                            });
                            return false;
                        }
                        self.chunk = ChunkPhase::Data { remaining: size };
                        true
                    }
                }
            }
            ChunkPhase::Data { remaining } => {
                let taken = self.buf.take(remaining);
                if taken.is_empty() {
                    return false;
                }
                self.request.body.extend_from_slice(&taken);
                let remaining = remaining - taken.len();
                self.chunk = if remaining == 0 {
                    ChunkPhase::DataEnd
                } else {
                    ChunkPhase::Data { remaining }
                };
                true
            }
            ChunkPhase::DataEnd => {
                let first = self.buf.remaining().first().copied();
                let second = self.buf.remaining().get(1).copied();
                match (first, second) {
                    // Terminator not here yet.
                    (None, _) | (Some(b'\r'), None) => false,
                    (Some(b'\n'), _) => {
                        self.buf.consume(1);
                        self.chunk = ChunkPhase::Size;
                        true
                    }
                    (Some(b'\r'), Some(b'\n')) => {
                        self.buf.consume(2);
                        self.chunk = ChunkPhase::Size;
                        true
                    }
                    _ => {
                        self.fail(Error::ChunkLengthMismatch);
                        false
                    }
                }
            }
            ChunkPhase::Trailers => {
                let Some(line) = self.buf.next_line() else {
                    if self.header_bytes + self.buf.len() > self.limits.max_header_bytes {
                        self.fail(Error::RequestTooLarge {
                            what: "header section",
                            limit: self.limits.max_header_bytes,
                        });
                    }
                    return false;
                };
                self.header_bytes += line.len() + 2;
                if self.header_bytes > self.limits.max_header_bytes {
                    self.fail(Error::RequestTooLarge {
                        what: "header section",
                        limit: self.limits.max_header_bytes,
                    });
                    return false;
                }
                if line.is_empty() {
                    self.complete();
                    return true;
                }
                // Trailer fields share the header grammar and are merged into
                // the main header map.
                match parse_header_field(&line) {
                    Ok((name, value)) => {
                        self.request.headers.append(&name, value);
                        true
                    }
                    Err(err) => {
                        self.fail(err);
                        false
                    }
                }
            }
        }
    }

    fn complete(&mut self) {
        self.state = ParseState::Complete;
        debug!(
            "request complete: {} {} ({} body bytes)",
            self.request.method,
            self.request.target,
            self.request.body.len()
        );
    }

    fn fail(&mut self, error: Error) {
        debug!("request parsing failed: {error}");
        self.error = Some(error);
        self.state = ParseState::Failed;
    }
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive the body framing from the collected headers.
fn framing_from_headers(headers: &HeaderMap) -> Result<(Option<usize>, bool), Error> {
    let mut content_length = None;
    let declared = headers.get_all("content-length");
    if let Some(first) = declared.first() {
        if declared.iter().any(|value| value != first) {
            return Err(Error::DuplicateConflictingLengthHeaders);
        }
        if first.is_empty() || !first.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidContentLength(first.clone()));
        }
        let length = first
            .parse::<usize>()
            .map_err(|_| Error::InvalidContentLength(first.clone()))?;
        content_length = Some(length);
    }

    let chunked = headers
        .get_all("transfer-encoding")
        .iter()
        .any(|value| value.to_ascii_lowercase().contains("chunked"));

    if content_length.is_some() && chunked {
        return Err(Error::DuplicateConflictingLengthHeaders);
    }
    Ok((content_length, chunked))
}

/// Split a header (or trailer) line into its lower-cased name and trimmed
/// value.
fn parse_header_field(line: &[u8]) -> Result<(String, String), Error> {
    let text = String::from_utf8_lossy(line);
    let Some((name, value)) = text.split_once(':') else {
        return Err(Error::MalformedHeaderLine(text.into_owned()));
    };
    let name = name.trim();
    if name.is_empty()
        || name
            .bytes()
            .any(|b| b.is_ascii_whitespace() || b.is_ascii_control())
    {
        return Err(Error::MalformedHeaderLine(text.into_owned()));
    }
    Ok((name.to_ascii_lowercase(), value.trim().to_string()))
}

fn is_method_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

/// Validate the `HTTP/<digit>.<digit>` shape, then classify the version.
fn classify_version(token: &str) -> Result<HttpVersion, Error> {
    let digits = token
        .strip_prefix("HTTP/")
        .ok_or_else(|| Error::InvalidMethodOrVersionGrammar(token.to_string()))?;
    let shape_ok = matches!(
        digits.as_bytes(),
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit()
    );
    if !shape_ok {
        return Err(Error::InvalidMethodOrVersionGrammar(token.to_string()));
    }
    Ok(HttpVersion::from_token(token))
}
