//! Body framing and the chunked-transfer grammar.

use crate::parser::error::Error;

/// How the message body is delimited.
///
/// Chosen once by the header scanner and fixed for the life of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum BodyFraming {
    /// No body is expected.
    #[default]
    None,
    /// Exactly this many bytes follow the header section.
    Length(usize),
    /// A chunked-transfer sequence follows.
    Chunked,
}

/// Position inside the chunked-transfer grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum ChunkPhase {
    /// Expecting a chunk-size line.
    #[default]
    Size,
    /// Consuming chunk data.
    Data {
        /// Bytes of the current chunk still to arrive.
        remaining: usize,
    },
    /// Expecting the CRLF that closes a chunk's data.
    DataEnd,
    /// Expecting trailer lines after the zero-size chunk.
    Trailers,
}

/// Parse a chunk-size line: hexadecimal digits, then an optional
/// `;`-introduced extension which is ignored.
pub(crate) fn parse_chunk_size(line: &[u8]) -> Result<usize, Error> {
    let text = String::from_utf8_lossy(line).into_owned();
    let digits = text.split(';').next().unwrap_or("").trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::MalformedChunkSize(text));
    }
    match usize::from_str_radix(digits, 16) {
        Ok(size) => Ok(size),
        Err(_) => Err(Error::MalformedChunkSize(text)),
    }
}
