//! HTTP client for the school activity-feed API

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::auth::TokenProvider;
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::types::{
    parse_like_snapshot, parse_post_list, LikeSnapshot, ListPostsRequest, PostPage,
    ToggleLikeRequest,
};

/// The school API surface the feed engine depends on.
///
/// Abstracted as a trait so the engine can be driven by fakes in tests.
#[async_trait]
pub trait SchoolApi: Send + Sync {
    /// Fetch a page of activity-feed posts.
    async fn list_posts(&self, request: &ListPostsRequest) -> ApiResult<PostPage>;

    /// Toggle the viewer's like on a post; returns the server's resulting state.
    async fn toggle_like(&self, request: &ToggleLikeRequest) -> ApiResult<LikeSnapshot>;
}

/// Reqwest-backed client for the school backend
pub struct SchoolApiClient {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl SchoolApiClient {
    pub fn new(config: &ApiConfig, tokens: Arc<dyn TokenProvider>) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    /// POST a JSON body and return the decoded response body.
    ///
    /// Non-2xx responses are surfaced as [`ApiError::Status`] with whatever
    /// text the server sent; envelope-level failures are left to the callers
    /// that understand each endpoint's shape.
    async fn post_json<B>(&self, path: &str, body: &B) -> ApiResult<serde_json::Value>
    where
        B: Serialize + Sync,
    {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let token = self.tokens.bearer_token().await?;

        debug!(url = %url, "school API request");
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(url = %url, code = status.as_u16(), "school API request failed");
            return Err(ApiError::Status {
                code: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl SchoolApi for SchoolApiClient {
    async fn list_posts(&self, request: &ListPostsRequest) -> ApiResult<PostPage> {
        let body = self.post_json("school-posts/list", request).await?;
        let page = parse_post_list(body)?;
        debug!(
            posts = page.posts.len(),
            page = request.page,
            "fetched post page"
        );
        Ok(page)
    }

    async fn toggle_like(&self, request: &ToggleLikeRequest) -> ApiResult<LikeSnapshot> {
        let body = self.post_json("school-posts/toggle-like", request).await?;
        parse_like_snapshot(body)
    }
}
