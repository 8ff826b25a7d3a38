//! HTTP request methods.

use std::fmt;

/// HTTP request methods understood by the server.
///
/// Any other lexically valid method token classifies as [`Method::Unknown`]
/// rather than failing the parse; whether to answer such a request with 501
/// is the server's decision, not the parser's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    /// GET method: requests a representation of the specified resource.
    GET,
    /// POST method: submits data to be processed to the identified resource.
    POST,
    /// DELETE method: deletes the specified resource.
    DELETE,
    /// HEAD method: same as GET but only transfers the status line and header section.
    HEAD,
    /// A method token the server does not implement.
    #[default]
    Unknown,
}

impl Method {
    /// Classify a request-line method token.
    ///
    /// Matching is exact and case-sensitive, so `get` classifies `Unknown`.
    pub fn from_token(token: &str) -> Self {
        match token {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "DELETE" => Method::DELETE,
            "HEAD" => Method::HEAD,
            _ => Method::Unknown,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Unknown => write!(f, "UNKNOWN"),
            _ => write!(f, "{self:?}"),
        }
    }
}
