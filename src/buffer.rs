//! Per-connection residual buffering.
//!
//! [`ConnectionBuffer`] accumulates transport chunks and drives the frame
//! decoder to completion after each read event. It owns the only mutable
//! state a connection carries: the bytes received but not yet resolved into
//! a complete frame.

use bytes::{Buf, BytesMut};
use serde_json::Value;
use tracing::warn;

use crate::frame::{DecodeOutcome, decode_frame};

/// Residual byte buffer for one live connection.
///
/// Invariant: after [`next_frame`](Self::next_frame) returns a value, the
/// buffer no longer holds any byte belonging to that value. On a malformed
/// frame the entire buffer is cleared, trading loss of the fragment for a
/// clean resynchronisation point at the next append.
#[derive(Debug, Default)]
pub struct ConnectionBuffer {
    buf: BytesMut,
}

impl ConnectionBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: BytesMut::new(),
        }
    }

    /// Append a freshly read transport chunk.
    pub fn append(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Number of bytes awaiting a complete frame.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True when no residual bytes are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Extract the next complete frame, if the buffer holds one.
    ///
    /// Returns `None` both when the buffer holds only a prefix of a value
    /// (more bytes are needed) and after a malformed frame was discarded.
    /// Callers loop until `None` after every append, since one chunk may
    /// complete several frames.
    pub fn next_frame(&mut self) -> Option<Value> {
        if self.buf.is_empty() {
            return None;
        }
        match decode_frame(&self.buf) {
            DecodeOutcome::Frame { value, consumed } => {
                self.buf.advance(consumed);
                self.trim_leading_whitespace();
                Some(value)
            }
            DecodeOutcome::Incomplete => None,
            DecodeOutcome::Invalid(e) => {
                warn!(error = %e, discarded = self.buf.len(), "malformed frame, clearing buffer");
                self.buf.clear();
                None
            }
        }
    }

    fn trim_leading_whitespace(&mut self) {
        let skip = self
            .buf
            .iter()
            .take_while(|b| b.is_ascii_whitespace())
            .count();
        self.buf.advance(skip);
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::{Value, json};

    use super::ConnectionBuffer;

    fn drain(buffer: &mut ConnectionBuffer) -> Vec<Value> {
        let mut frames = Vec::new();
        while let Some(frame) = buffer.next_frame() {
            frames.push(frame);
        }
        frames
    }

    #[test]
    fn single_complete_object_in_one_chunk() {
        let mut buffer = ConnectionBuffer::new();
        buffer.append(br#"{"SERIAL":"X1"}"#);
        assert_eq!(drain(&mut buffer), vec![json!({"SERIAL": "X1"})]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn value_split_across_two_chunks() {
        let mut buffer = ConnectionBuffer::new();
        buffer.append(br#"{"LATITU"#);
        assert!(buffer.next_frame().is_none());
        assert_eq!(buffer.len(), 8);

        buffer.append(br#"DE":1.0,"LONGITUDE":2.0}"#);
        assert_eq!(
            drain(&mut buffer),
            vec![json!({"LATITUDE": 1.0, "LONGITUDE": 2.0})]
        );
    }

    #[test]
    fn two_concatenated_objects_drain_in_order() {
        let mut buffer = ConnectionBuffer::new();
        buffer.append(br#"{"A":1}{"B":2}"#);
        assert_eq!(drain(&mut buffer), vec![json!({"A": 1}), json!({"B": 2})]);
    }

    #[test]
    fn malformed_prefix_clears_buffer_and_next_object_decodes() {
        let mut buffer = ConnectionBuffer::new();
        buffer.append(br#"{"A":}"#);
        assert!(buffer.next_frame().is_none());
        assert!(buffer.is_empty());

        buffer.append(br#"{"B":2}"#);
        assert_eq!(drain(&mut buffer), vec![json!({"B": 2})]);
    }

    #[test]
    fn truncated_prefix_turned_invalid_discards_appended_bytes_too() {
        let mut buffer = ConnectionBuffer::new();
        buffer.append(br#"{"LATITUDE":"#);
        assert!(buffer.next_frame().is_none());
        // The continuation makes the fragment syntactically broken rather
        // than completing it.
        buffer.append(br#"}{"B":2}"#);
        assert!(buffer.next_frame().is_none());
        assert!(buffer.is_empty());
    }

    #[test]
    fn interleaved_whitespace_between_objects() {
        let mut buffer = ConnectionBuffer::new();
        buffer.append(b" {\"A\":1} \n\t {\"B\":2}\n");
        assert_eq!(drain(&mut buffer), vec![json!({"A": 1}), json!({"B": 2})]);
        assert!(buffer.is_empty());
    }

    proptest! {
        /// Any sequence of valid objects joined by arbitrary whitespace and
        /// split at arbitrary chunk boundaries drains to exactly the
        /// original objects, in order.
        #[test]
        fn arbitrary_splits_preserve_frame_sequence(
            values in proptest::collection::vec(0i64..1000, 1..8),
            separators in proptest::collection::vec(0usize..4, 8),
            chunk_len in 1usize..16,
        ) {
            let whitespace = [" ", "\n", "\t", ""];
            let mut stream = Vec::new();
            for (i, v) in values.iter().enumerate() {
                stream.extend_from_slice(
                    whitespace[separators[i % separators.len()]].as_bytes(),
                );
                stream.extend_from_slice(format!("{{\"N\":{v}}}").as_bytes());
            }

            let mut buffer = ConnectionBuffer::new();
            let mut decoded = Vec::new();
            for chunk in stream.chunks(chunk_len) {
                buffer.append(chunk);
                while let Some(frame) = buffer.next_frame() {
                    decoded.push(frame);
                }
            }

            let expected: Vec<Value> = values.iter().map(|v| json!({"N": v})).collect();
            prop_assert_eq!(decoded, expected);
        }
    }
}
