use std::env;

use tracing::debug;

use crate::provider::GenerativeProvider;
use crate::transport::{StreamClient, StreamRequest};
use crate::types::GenerationRequest;
use crate::{Error, StreamResponse};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini-style backend binding.
///
/// Shapes [`GenerationRequest`]s into the wire format (API key header, JSON
/// body, `streamGenerateContent` endpoint) and binds the transport's byte
/// stream to a [`StreamResponse`].
pub struct GeminiProvider {
    client: StreamClient,
    api_key: String,
    base_url: String,
}

impl GeminiProvider {
    /// Create a provider against the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Result<Self, Error> {
        Ok(Self {
            client: StreamClient::new()?,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Create a provider with a custom base URL (for testing).
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, Error> {
        let mut provider = Self::new(api_key)?;
        provider.base_url = base_url.into();
        Ok(provider)
    }

    /// Create a provider from environment variables.
    ///
    /// `GEMINI_API_KEY` is required; `GEMINI_BASE_URL` optionally overrides
    /// the endpoint.
    pub fn from_env() -> Result<Self, Error> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| Error::config("GEMINI_API_KEY environment variable is required"))?;
        match env::var("GEMINI_BASE_URL") {
            Ok(base_url) => Self::with_base_url(api_key, base_url),
            Err(_) => Self::new(api_key),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }

    fn build_request(&self, request: &GenerationRequest) -> Result<StreamRequest, Error> {
        if request.contents.is_empty() {
            return Err(Error::validation(
                "generation request requires at least one content turn",
            ));
        }
        if request.model.is_empty() {
            return Err(Error::validation("generation request requires a model"));
        }

        let body = serde_json::to_value(request)?;
        Ok(StreamRequest::post(self.endpoint(&request.model), body)
            .with_header("x-goog-api-key", &self.api_key)
            .with_header("Content-Type", "application/json"))
    }
}

#[async_trait::async_trait]
impl GenerativeProvider for GeminiProvider {
    async fn generate_stream(&self, request: &GenerationRequest) -> Result<StreamResponse, Error> {
        let stream_request = self.build_request(request)?;
        debug!(model = %request.model, turns = request.contents.len(), "generating");
        let response = self.client.request_stream(stream_request).await?;
        Ok(response)
    }
}
