//! Streaming JSON frame decoding.
//!
//! A frame is one complete JSON value as it appears in the byte stream.
//! [`decode_frame`] attempts to extract the first frame from an accumulated
//! buffer and reports how many bytes it consumed, so callers can drop those
//! bytes and try again for any further frames in the same buffer.

use serde_json::Value;

/// Result of one decode attempt against the front of a buffer.
#[derive(Debug)]
pub enum DecodeOutcome {
    /// A complete value was decoded starting at offset 0.
    Frame {
        /// The decoded JSON value.
        value: Value,
        /// Bytes consumed from the start of the buffer, including any
        /// leading whitespace before the value.
        consumed: usize,
    },
    /// The buffer holds a prefix of a value; more bytes are needed.
    Incomplete,
    /// The leading content is not a valid JSON value.
    Invalid(serde_json::Error),
}

/// Attempt to decode the first complete JSON value from `buf`.
///
/// Pure function of its input: no state is carried between calls. Callers
/// invoke it repeatedly per buffer-fill event, dropping `consumed` bytes
/// after each [`DecodeOutcome::Frame`], since a single chunk may carry
/// several concatenated values.
///
/// Truncated input (the stream ended mid-value) yields
/// [`DecodeOutcome::Incomplete`]; syntactically broken input yields
/// [`DecodeOutcome::Invalid`]. An empty or whitespace-only buffer is
/// `Incomplete`.
#[must_use]
pub fn decode_frame(buf: &[u8]) -> DecodeOutcome {
    let mut stream = serde_json::Deserializer::from_slice(buf).into_iter::<Value>();
    match stream.next() {
        Some(Ok(value)) => DecodeOutcome::Frame {
            value,
            consumed: stream.byte_offset(),
        },
        Some(Err(e)) if e.is_eof() => DecodeOutcome::Incomplete,
        Some(Err(e)) => DecodeOutcome::Invalid(e),
        None => DecodeOutcome::Incomplete,
    }
}
