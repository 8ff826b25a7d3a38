//! HTTP parser module.
//!
//! An incremental HTTP/1.x request parser: bytes go in as they arrive off
//! the transport, in whatever fragments the transport produced, and the
//! state machine advances exactly as far as the data allows.

mod body;
mod error;
mod headers;
mod limits;
mod machine;
mod method;
mod request;
mod scan;
mod version;

#[cfg(test)]
mod tests;

// Re-export public items
pub use error::Error;
pub use headers::HeaderMap;
pub use limits::ParserLimits;
pub use machine::{ParseState, RequestParser};
pub use method::Method;
pub use request::HttpRequest;
pub use version::HttpVersion;

// Re-export the parse_request function
pub use request::parse_request;
