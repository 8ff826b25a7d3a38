//! Parser resource limits.

/// Size limits enforced while a request is being parsed.
///
/// Limits bound what a single request may buffer before the parser gives up
/// with [`Error::RequestTooLarge`](crate::parser::Error::RequestTooLarge).
/// The request line and each chunk-size line are bounded by
/// `max_request_line_bytes`; the header section (trailers included) by
/// `max_header_bytes`; the decoded body by `max_body_bytes`.
#[derive(Debug, Clone, Copy)]
pub struct ParserLimits {
    /// Maximum length of the request line, in bytes.
    pub max_request_line_bytes: usize,
    /// Maximum total size of the header section, in bytes.
    pub max_header_bytes: usize,
    /// Maximum size of the decoded body, in bytes.
    pub max_body_bytes: usize,
}

impl ParserLimits {
    /// Limits that never trigger.
    pub fn unlimited() -> Self {
        Self {
            max_request_line_bytes: usize::MAX,
            max_header_bytes: usize::MAX,
            max_body_bytes: usize::MAX,
        }
    }
}

impl Default for ParserLimits {
    fn default() -> Self {
        Self {
            max_request_line_bytes: 8 * 1024,
            max_header_bytes: 32 * 1024,
            max_body_bytes: 1024 * 1024,
        }
    }
}
