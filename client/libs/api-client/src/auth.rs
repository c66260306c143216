//! Bearer-token supply for school API requests
//!
//! Token issuance, refresh, and storage belong to the host app's session
//! layer; the client only needs a way to ask for the current token right
//! before each request.

use async_trait::async_trait;

use crate::error::ApiResult;

/// Source of the bearer token attached to every API request
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Current bearer token for the active session
    async fn bearer_token(&self) -> ApiResult<String>;
}

/// Fixed token, for tests and one-off tooling
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> ApiResult<String> {
        Ok(self.token.clone())
    }
}
