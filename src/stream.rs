//! Lazy decoding of streamed response bodies into complete JSON values.

use std::pin::Pin;
use std::task::{ready, Context, Poll};

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use serde_json::Value;
use tracing::trace;

use crate::error::{DecodeError, Error, RequestError};

/// The raw byte source a stream response is bound to.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, RequestError>> + Send>>;

/// Upper bound on a single buffered fragment. A well-formed streaming chunk
/// is a few KB; anything past this is a broken peer.
const MAX_FRAGMENT_BYTES: usize = 1_000_000;

/// Decodes a byte stream into a lazy, finite sequence of complete JSON
/// values.
///
/// The source delivers the body in arbitrary slices; values are only yielded
/// once a full JSON object has been accumulated, so a delivery boundary in
/// the middle of a value (or in the middle of a multi-byte character) never
/// produces a partial emission. Array brackets and comma separators of the
/// provider's framing are consumed between values. The sequence is
/// single-use: after end-of-source or the first error it is terminal and
/// every subsequent poll yields `None`.
pub struct JsonChunkStream {
    inner: ByteStream,
    /// Raw bytes not yet consumed by a complete value.
    buffer: Vec<u8>,
    source_done: bool,
    finished: bool,
}

impl JsonChunkStream {
    /// Create a decoder over a byte stream.
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, RequestError>> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
            buffer: Vec::new(),
            source_done: false,
            finished: false,
        }
    }

    /// Drop leading inter-value framing: whitespace, the commas between
    /// values, and the array brackets wrapping them.
    fn skip_framing(&mut self) {
        let skipped = self
            .buffer
            .iter()
            .take_while(|&&b| matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b',' | b'[' | b']'))
            .count();
        if skipped > 0 {
            self.buffer.drain(..skipped);
        }
    }

    /// Try to take one complete JSON value off the front of the buffer.
    ///
    /// `Ok(None)` means more bytes are needed (empty buffer or an object
    /// still open at the buffer's end).
    fn try_extract(&mut self) -> Result<Option<Value>, DecodeError> {
        self.skip_framing();

        if self.buffer.is_empty() {
            return Ok(None);
        }

        if self.buffer[0] != b'{' {
            return Err(DecodeError::malformed(
                "expected start of JSON object",
                preview(&self.buffer),
            ));
        }

        let Some(end) = complete_object_end(&self.buffer) else {
            return Ok(None);
        };

        let value = serde_json::from_slice(&self.buffer[..end])
            .map_err(|e| DecodeError::malformed(e.to_string(), preview(&self.buffer[..end])))?;
        trace!(bytes = end, "decoded stream value");
        self.buffer.drain(..end);
        Ok(Some(value))
    }
}

impl Stream for JsonChunkStream {
    type Item = Result<Value, Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.finished {
            return Poll::Ready(None);
        }

        loop {
            match self.try_extract() {
                Ok(Some(value)) => return Poll::Ready(Some(Ok(value))),
                Ok(None) => {}
                Err(e) => {
                    self.finished = true;
                    self.buffer.clear();
                    return Poll::Ready(Some(Err(e.into())));
                }
            }

            if self.source_done {
                self.finished = true;
                if !self.buffer.is_empty() {
                    // the connection closed mid-value; the partial fragment
                    // is discarded, never yielded
                    let buffered = self.buffer.len();
                    self.buffer.clear();
                    return Poll::Ready(Some(Err(DecodeError::Truncated { buffered }.into())));
                }
                return Poll::Ready(None);
            }

            match ready!(self.inner.poll_next_unpin(cx)) {
                Some(Ok(chunk)) => {
                    self.buffer.extend_from_slice(&chunk);
                    if self.buffer.len() > MAX_FRAGMENT_BYTES {
                        self.finished = true;
                        self.buffer.clear();
                        return Poll::Ready(Some(Err(DecodeError::FragmentTooLarge {
                            limit: MAX_FRAGMENT_BYTES,
                        }
                        .into())));
                    }
                }
                Some(Err(e)) => {
                    self.finished = true;
                    self.buffer.clear();
                    return Poll::Ready(Some(Err(e.into())));
                }
                None => {
                    self.source_done = true;
                }
            }
        }
    }
}

/// Index one past the closing brace of the object at the start of `input`,
/// or `None` while the object is still open.
///
/// Tracks brace/bracket depth, string boundaries, and escape sequences so
/// structural bytes inside strings are ignored. Operates on raw bytes: the
/// ASCII bytes inspected here cannot occur inside a multi-byte UTF-8
/// sequence, so a delivery split anywhere is safe.
fn complete_object_end(input: &[u8]) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, &byte) in input.iter().enumerate() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match byte {
            b'\\' if in_string => escape_next = true,
            b'"' => in_string = !in_string,
            b'{' | b'[' if !in_string => depth += 1,
            b'}' | b']' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}

fn preview(bytes: &[u8]) -> String {
    const LIMIT: usize = 120;
    let slice = &bytes[..bytes.len().min(LIMIT)];
    String::from_utf8_lossy(slice).into_owned()
}
