//! HTTP request representation.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::parser::error::Error;
use crate::parser::headers::HeaderMap;
use crate::parser::machine::RequestParser;
use crate::parser::method::Method;
use crate::parser::version::HttpVersion;

/// Represents an HTTP request.
///
/// A request is built up incrementally by [`RequestParser`]; every field is
/// readable at any point, but only meaningful once the sub-machine that fills
/// it has completed.
#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The raw request target, path and query still joined.
    pub target: String,
    /// The HTTP version.
    pub version: HttpVersion,
    /// The HTTP headers.
    pub headers: HeaderMap,
    /// The request body.
    pub body: Vec<u8>,
    /// The declared `Content-Length`, when that framing mode is active.
    pub content_length: Option<usize>,
    /// Whether the body uses chunked transfer encoding.
    pub chunked: bool,
}

impl HttpRequest {
    /// Get a header value by name (case-insensitive). The first value wins
    /// for repeated fields; use [`HeaderMap::get_all`] for the full list.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Check if the request has a specific header (case-insensitive).
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains(name)
    }

    /// The target without its query string.
    pub fn path(&self) -> &str {
        self.target
            .split_once('?')
            .map(|(path, _)| path)
            .unwrap_or(&self.target)
    }

    /// Query parameters decoded from the target.
    ///
    /// The target itself stays raw; this splits it on demand.
    pub fn query_params(&self) -> HashMap<String, String> {
        self.target
            .split_once('?')
            .map(|(_, query)| {
                query
                    .split('&')
                    .filter(|s| !s.is_empty())
                    .map(|pair| {
                        if let Some((k, v)) = pair.split_once('=') {
                            (k.to_string(), v.to_string())
                        } else {
                            (pair.to_string(), String::new())
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Parse the request body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Check if the request declares a JSON body.
    pub fn is_json(&self) -> bool {
        self.get_header("Content-Type")
            .is_some_and(|content_type| content_type.starts_with("application/json"))
    }
}

/// Parse a complete HTTP request from a byte slice.
///
/// Convenience wrapper over [`RequestParser`] for callers that already hold
/// the whole message. An incomplete message fails with
/// [`Error::UnexpectedConnectionClose`], since from the parser's point of
/// view the input simply ended early.
///
/// # Examples
///
/// ```
/// use feedhttp_rs::parse_request;
///
/// let request_bytes = b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n";
/// let request = parse_request(request_bytes).unwrap();
///
/// assert_eq!(request.method.to_string(), "GET");
/// assert_eq!(request.target, "/index.html");
/// assert_eq!(request.headers.get("host"), Some("example.com"));
/// ```
pub fn parse_request(input: &[u8]) -> Result<HttpRequest, Error> {
    let mut parser = RequestParser::new();
    parser.feed(input);
    parser.finish();
    match parser.take_request() {
        Some(request) => Ok(request),
        None => Err(parser
            .error()
            .cloned()
            .unwrap_or(Error::UnexpectedConnectionClose)),
    }
}
