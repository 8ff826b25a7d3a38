//! Error types for the HTTP parser.

use thiserror::Error;

/// Errors that can occur during HTTP request parsing.
///
/// Every variant is terminal: a parser that reported one stays failed and
/// consumes no further input. Variants carry the offending token where one
/// exists so the server can choose a response status without re-scanning the
/// input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The request line did not split into method, target and version.
    #[error("Malformed request line: {0}")]
    MalformedRequestLine(String),

    /// The method or version token violates the token grammar itself.
    #[error("Invalid method or version token: {0}")]
    InvalidMethodOrVersionGrammar(String),

    /// A header line has no colon, or its field name is invalid.
    #[error("Malformed header line: {0}")]
    MalformedHeaderLine(String),

    /// Conflicting body framing: repeated `Content-Length` fields that
    /// disagree, or `Content-Length` alongside `Transfer-Encoding: chunked`.
    #[error("Conflicting body length headers")]
    DuplicateConflictingLengthHeaders,

    /// `Content-Length` is not a valid non-negative integer.
    #[error("Invalid Content-Length: {0}")]
    InvalidContentLength(String),

    /// A chunk-size line is not valid hexadecimal.
    #[error("Malformed chunk size: {0}")]
    MalformedChunkSize(String),

    /// Chunk data was not followed by its CRLF terminator.
    #[error("Chunk data does not match its declared length")]
    ChunkLengthMismatch,

    /// The stream ended before the message was complete.
    #[error("Connection closed before the request was complete")]
    UnexpectedConnectionClose,

    /// A configured size limit was exceeded.
    #[error("Request {what} exceeds the limit of {limit} bytes")]
    RequestTooLarge {
        /// Which part of the message hit its limit.
        what: &'static str,
        /// The configured limit, in bytes.
        limit: usize,
    },
}
