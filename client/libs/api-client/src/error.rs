/// Error types for the school API client
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("school API returned status {code}: {message}")]
    Status { code: u16, message: String },

    #[error("school API reported failure: {0}")]
    Api(String),

    #[error("response decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("token provider error: {0}")]
    Auth(String),
}

/// Result type alias for API client operations
pub type ApiResult<T> = Result<T, ApiError>;
