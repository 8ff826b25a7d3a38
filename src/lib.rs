//! An incremental HTTP/1.x request parser library.
//!
//! This library parses HTTP requests as they trickle in off a non-blocking
//! socket, with a focus on correctness under arbitrary read fragmentation:
//! a read boundary may fall mid-method, mid-header-name or mid-chunk-size and
//! the parser resumes without losing a byte.
//!
//! # Features
//!
//! - Incremental parsing driven by [`RequestParser::feed`]; no blocking reads,
//!   no internal I/O
//! - Fixed-length (`Content-Length`) and chunked (`Transfer-Encoding`)
//!   body decoding, with trailer fields merged into the header map
//! - Pipelining: unconsumed bytes carry over into the next request on the
//!   same connection, in arrival order
//! - A [`Connection`] wrapper owning the lifecycle phases the parser must not
//!   know about (response in flight, closed)
//! - Unknown methods and versions classify as data rather than failing the
//!   parse; malformed input fails with a descriptive [`Error`]
//! - JSON body helpers on the parsed request
//!
//! # Examples
//!
//! ## Incremental parsing
//!
//! ```
//! use feedhttp_rs::{ParseState, RequestParser};
//!
//! let mut parser = RequestParser::new();
//!
//! // Bytes arrive in whatever fragments the socket produced.
//! parser.feed(b"POST /upload HTTP/1.1\r\nHost: example.com\r\nContent-Le");
//! parser.feed(b"ngth: 5\r\n\r\nhel");
//! assert_eq!(parser.state(), ParseState::Body);
//!
//! parser.feed(b"lo");
//! assert_eq!(parser.state(), ParseState::Complete);
//!
//! let request = parser.take_request().unwrap();
//! assert_eq!(request.target, "/upload");
//! assert_eq!(request.body, b"hello");
//! ```
//!
//! ## Driving a connection
//!
//! ```
//! use feedhttp_rs::{Connection, HttpStatus};
//!
//! let mut conn = Connection::new();
//!
//! // Two pipelined requests in a single read.
//! conn.feed(b"GET /a HTTP/1.1\r\nHost: x\r\n\r\nGET /b HTTP/1.1\r\nHost: x\r\n\r\n");
//!
//! let first = conn.take_request().unwrap();
//! assert_eq!(first.target, "/a");
//! assert_eq!(conn.status(), HttpStatus::SendingResponse);
//!
//! conn.response_sent();
//! let second = conn.take_request().unwrap();
//! assert_eq!(second.target, "/b");
//! ```
//!
//! ## Error handling
//!
//! ```
//! use feedhttp_rs::{Error, HttpStatus, Connection};
//!
//! let mut conn = Connection::new();
//! conn.feed(b"GET /a HTTP/1.1\r\nNoColonHere\r\n\r\n");
//!
//! assert_eq!(conn.status(), HttpStatus::Error);
//! assert!(matches!(conn.error(), Some(Error::MalformedHeaderLine(_))));
//! ```

// Export the parser module
pub mod parser;

// Export the connection module
pub mod conn;

// Re-export commonly used items for convenience
pub use conn::{Connection, HttpStatus};
pub use parser::{
    parse_request, Error, HeaderMap, HttpRequest, HttpVersion, Method, ParseState, ParserLimits,
    RequestParser,
};
