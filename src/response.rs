//! The live, single-use handle over an in-flight streamed reply.

use bytes::Bytes;
use futures_util::{stream, Stream, StreamExt};
use serde_json::Value;
use tracing::debug;

use crate::accumulator::CandidatesAccumulator;
use crate::error::Error;
use crate::stream::JsonChunkStream;
use crate::types::{Candidates, GenerationChunk};

/// A streamed generation response bound to its unconsumed byte source.
///
/// The response exclusively owns the underlying connection and is consumed
/// exactly once: [`read_stream`](StreamResponse::read_stream) and
/// [`candidates`](StreamResponse::candidates) take `self`. Dropping it at
/// any point (fully drained, abandoned early, or after a mid-iteration
/// error) releases the connection with it.
pub struct StreamResponse {
    values: JsonChunkStream,
}

impl std::fmt::Debug for StreamResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamResponse").finish_non_exhaustive()
    }
}

impl StreamResponse {
    /// Bind a response to a live byte source.
    pub fn new<S>(source: S) -> Self
    where
        S: Stream<Item = Result<Bytes, crate::error::RequestError>> + Send + 'static,
    {
        Self {
            values: JsonChunkStream::new(source),
        }
    }

    /// A response over an in-memory body, delivered in one piece. Used by
    /// the mock path and by tests.
    pub fn from_body(body: Bytes) -> Self {
        Self::new(stream::iter([Ok(body)]))
    }

    /// The lazy sequence of decoded chunks.
    ///
    /// Each element is produced only when polled; an error payload inside a
    /// successful response surfaces as [`Error::Provider`] at its position
    /// in the sequence.
    pub fn read_stream(self) -> impl Stream<Item = Result<GenerationChunk, Error>> + Send {
        self.values
            .map(|result| result.and_then(chunk_from_value))
    }

    /// Drain the stream and aggregate everything into a final candidate
    /// set.
    pub async fn candidates(self) -> Result<Candidates, Error> {
        let mut accumulator = CandidatesAccumulator::new();
        let mut chunks = Box::pin(self.read_stream());
        while let Some(chunk) = chunks.next().await {
            accumulator.push_chunk(chunk?);
        }
        Ok(accumulator.finalize())
    }
}

/// Map one decoded JSON value to the outward chunk contract.
fn chunk_from_value(value: Value) -> Result<GenerationChunk, Error> {
    if let Some(payload) = value.get("error") {
        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| payload.to_string());
        debug!(%message, "provider error payload in response stream");
        return Err(Error::provider(message));
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_read_stream_yields_typed_chunks() {
        let body = r#"[{"candidates":[{"content":{"role":"model","parts":[{"text":"Hi"}]}}]},
{"candidates":[{"content":{"role":"model","parts":[{"text":"!"}]},"finishReason":"STOP"}]}]"#;
        let response = StreamResponse::from_body(Bytes::from(body));

        let chunks: Vec<GenerationChunk> = Box::pin(response.read_stream())
            .map(|r| r.unwrap())
            .collect()
            .await;
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].candidates[0].text(), "Hi");
        assert_eq!(
            chunks[1].candidates[0].finish_reason.as_deref(),
            Some("STOP")
        );
    }

    #[tokio::test]
    async fn test_error_payload_surfaces_as_provider_error() {
        let body = r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#;
        let response = StreamResponse::from_body(Bytes::from(body));

        let err = response.candidates().await.unwrap_err();
        match err {
            Error::Provider { message } => {
                assert!(message.contains("Resource has been exhausted"))
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_candidates_aggregates_full_stream() {
        let body = r#"[{"candidates":[{"content":{"role":"model","parts":[{"text":"The answer"}]}}]},
{"candidates":[{"content":{"role":"model","parts":[{"text":" is 42."}]},"finishReason":"STOP"}],"usageMetadata":{"totalTokenCount":7}}]"#;
        let response = StreamResponse::from_body(Bytes::from(body));

        let candidates = response.candidates().await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates.first_text().as_deref(), Some("The answer is 42."));
    }

    #[tokio::test]
    async fn test_decode_failure_propagates_through_candidates() {
        let response = StreamResponse::from_body(Bytes::from("{\"candidates\": [}"));
        let err = response.candidates().await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
