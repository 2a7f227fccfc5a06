use thiserror::Error;

/// Transport-level failures raised before any response body is read.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("connection error: {0}")]
    Connection(String),
}

impl RequestError {
    pub fn connection(message: impl Into<String>) -> Self {
        RequestError::Connection(message.into())
    }
}

/// Failures while decoding the streamed response body.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed JSON in stream: {message}")]
    Malformed { message: String, fragment: String },

    #[error("stream ended mid-value ({buffered} bytes buffered)")]
    Truncated { buffered: usize },

    #[error("buffered fragment exceeded {limit} bytes")]
    FragmentTooLarge { limit: usize },
}

impl DecodeError {
    pub fn malformed(message: impl Into<String>, fragment: impl Into<String>) -> Self {
        DecodeError::Malformed {
            message: message.into(),
            fragment: fragment.into(),
        }
    }
}

/// Errors surfaced to callers of the genwire library.
///
/// Transport and decoding failures are wrapped into this type at the
/// provider boundary; callers only ever match on `Error`.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("provider reported failure: {message}")]
    Provider { message: String },

    #[error("data validation failed: {0}")]
    Validation(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no mock response configured for request")]
    MockUnconfigured,
}

impl Error {
    pub fn provider(message: impl Into<String>) -> Self {
        Error::Provider {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }
}
