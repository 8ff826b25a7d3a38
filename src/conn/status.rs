//! Combined connection status.

use std::fmt;

/// A connection's overall disposition.
///
/// Single source of truth for the server loop: the first three phases are
/// projected from the parser's [`ParseState`](crate::parser::ParseState), the
/// last three belong to the connection itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpStatus {
    /// Waiting for the request line.
    Pending,
    /// Scanning header lines.
    ParsingHeaders,
    /// Decoding the body.
    ParsingBody,
    /// A complete request is being answered.
    SendingResponse,
    /// The connection is done.
    Closed,
    /// A terminal parse error occurred.
    Error,
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpStatus::Pending => "pending",
            HttpStatus::ParsingHeaders => "parsing-headers",
            HttpStatus::ParsingBody => "parsing-body",
            HttpStatus::SendingResponse => "sending-response",
            HttpStatus::Closed => "closed",
            HttpStatus::Error => "error",
        };
        write!(f, "{name}")
    }
}
