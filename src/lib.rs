//! A unified streaming abstraction over generative AI provider APIs.
//!
//! This library lets calling code issue content-generation requests,
//! including streamed incrementally-delivered responses and function
//! calling, without depending on any single provider's wire format. It
//! ships a Gemini-style backend binding and a deterministic mock provider
//! for tests.

pub mod accumulator;
pub mod error;
pub mod mock;
pub mod provider;
pub mod providers;
pub mod response;
pub mod stream;
pub mod transport;
pub mod types;

// Re-export core types for easy usage
pub use accumulator::CandidatesAccumulator;
pub use error::{DecodeError, Error, RequestError};
pub use mock::{MockDispatcher, MockProvider, MockReply};
pub use provider::GenerativeProvider;
pub use providers::*;
pub use response::StreamResponse;
pub use stream::JsonChunkStream;
pub use transport::{StreamClient, StreamRequest};
pub use types::*;
