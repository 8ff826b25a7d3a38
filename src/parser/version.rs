//! HTTP protocol versions.

use std::fmt;

/// HTTP protocol versions understood by the server.
///
/// A well-formed `HTTP/<digit>.<digit>` token other than 1.0 or 1.1 (for
/// example `HTTP/2.0`) classifies as [`HttpVersion::Unknown`]; the parser
/// tolerates it and leaves the response-code decision to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpVersion {
    Http10,
    Http11,
    #[default]
    Unknown,
}

impl HttpVersion {
    /// Classify a request-line version token.
    pub fn from_token(token: &str) -> Self {
        match token {
            "HTTP/1.0" => HttpVersion::Http10,
            "HTTP/1.1" => HttpVersion::Http11,
            _ => HttpVersion::Unknown,
        }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpVersion::Http10 => write!(f, "HTTP/1.0"),
            HttpVersion::Http11 => write!(f, "HTTP/1.1"),
            HttpVersion::Unknown => write!(f, "UNKNOWN"),
        }
    }
}
