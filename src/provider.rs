use crate::{Error, GenerationRequest, StreamResponse};

/// A trait for generative-AI providers that can stream content generation.
/// Implemented by real wire bindings and by the mock provider, so calling
/// code never depends on a provider's wire format.
#[async_trait::async_trait]
pub trait GenerativeProvider: Send + Sync + 'static {
    /// Issue a generation request and return the live streamed response.
    async fn generate_stream(&self, request: &GenerationRequest) -> Result<StreamResponse, Error>;
}
