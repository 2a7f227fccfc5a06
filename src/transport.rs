//! HTTP dispatch for streamed generation requests.

use std::time::Duration;

use futures_util::TryStreamExt;
use reqwest::{Client, Method};
use tracing::debug;
use uuid::Uuid;

use crate::error::RequestError;
use crate::response::StreamResponse;

/// A fully-formed outbound request, shaped by a provider binding.
#[derive(Debug, Clone)]
pub struct StreamRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl StreamRequest {
    /// A POST request with a JSON body.
    pub fn post(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    /// Attach a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Performs stream requests and binds their live bodies to
/// [`StreamResponse`]s.
///
/// Each call owns an independent response; nothing is shared between
/// concurrent requests besides the connection pool inside the HTTP client.
pub struct StreamClient {
    http: Client,
}

impl StreamClient {
    pub fn new() -> Result<Self, RequestError> {
        let http = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self { http })
    }

    /// Wrap an already-configured HTTP client.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    /// Perform the network call.
    ///
    /// Fails with a [`RequestError`] on transport problems or a
    /// non-success status (the error body is drained into the message);
    /// on success the returned response is bound to the body without
    /// having consumed any of it.
    pub async fn request_stream(
        &self,
        request: StreamRequest,
    ) -> Result<StreamResponse, RequestError> {
        let request_id = Uuid::new_v4().simple().to_string();
        debug!(%request_id, url = %request.url, "dispatching stream request");

        let mut builder = self.http.request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            debug!(%request_id, status = status.as_u16(), "stream request rejected");
            return Err(RequestError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(%request_id, "stream response open");
        Ok(StreamResponse::new(
            response.bytes_stream().map_err(RequestError::Http),
        ))
    }
}
