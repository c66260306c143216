//! Feed orchestration
//!
//! Front door for the host app: refresh the canonical collection from the
//! gateway, derive the visible feed for a tab, toggle likes, switch viewers.
//! Fetch-then-filter is strictly sequential inside one refresh; filtering
//! never observes a fetch that has not resolved.

use std::sync::Arc;

use tracing::{debug, info, warn};

use classloop_api_client::{
    ApiResult, ListPostsRequest, SchoolApi, SchoolApiClient, TokenProvider,
};

use crate::config::{Config, StaleFetchPolicy};
use crate::error::{FetchResult, LikeError, LikeResult};
use crate::models::{FilterCriteria, LikeOutcome, Post, RenderablePost, ScopeKind, Viewer};
use crate::services::attribute::attribute_filter;
use crate::services::likes::LikeEngine;
use crate::services::presentation::present;
use crate::services::scope::scope_filter;
use crate::store::FeedStore;

/// What a refresh did with its fetched page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Installed { posts: usize },
    /// The viewer changed while the fetch was in flight and the stale-fetch
    /// policy is `Discard`
    Discarded,
}

pub struct FeedService {
    api: Arc<dyn SchoolApi>,
    store: Arc<FeedStore>,
    likes: LikeEngine,
    config: Config,
}

impl FeedService {
    pub fn new(config: Config, api: Arc<dyn SchoolApi>, store: Arc<FeedStore>) -> Self {
        let likes = LikeEngine::new(
            Arc::clone(&api),
            Arc::clone(&store),
            config.likes.allow_concurrent_toggles,
        );
        Self {
            api,
            store,
            likes,
            config,
        }
    }

    /// Service backed by a real HTTP client and a fresh store
    pub fn connect(config: Config, tokens: Arc<dyn TokenProvider>) -> ApiResult<Self> {
        let api = SchoolApiClient::new(&config.api, tokens)?;
        Ok(Self::new(config, Arc::new(api), Arc::new(FeedStore::new())))
    }

    /// Fetch the full post collection and install it as canonical state.
    ///
    /// The feed is loaded in a single page of the configured size and
    /// filtered client-side. A refresh that resolves after the viewer
    /// changed mid-flight is handled per the configured stale-fetch policy;
    /// the in-flight request itself is never cancelled.
    pub async fn refresh(&self) -> FetchResult<RefreshOutcome> {
        let started_generation = self.store.generation();
        let request = ListPostsRequest::fetch_all(self.config.feed.page_size);
        let page = self.api.list_posts(&request).await?;
        let posts: Vec<Post> = page.posts.into_iter().map(Post::from).collect();

        if self.store.generation() != started_generation {
            match self.config.feed.stale_fetch_policy {
                StaleFetchPolicy::Discard => {
                    warn!(
                        fetched = posts.len(),
                        "viewer changed during refresh, stale fetch discarded"
                    );
                    return Ok(RefreshOutcome::Discarded);
                }
                StaleFetchPolicy::Apply => {
                    warn!("viewer changed during refresh, stale fetch applied anyway");
                }
            }
        }

        let count = posts.len();
        self.store.install_posts(posts).await;
        info!(posts = count, "feed refreshed");
        Ok(RefreshOutcome::Installed { posts: count })
    }

    /// The feed a tab renders: scope filter, then attribute filter, then the
    /// viewer's like overrides, then presentation shaping.
    ///
    /// Without an active viewer every scope yields an empty feed (the safe
    /// default, consistent with fail-closed scope rules).
    pub async fn visible_posts(
        &self,
        kind: ScopeKind,
        criteria: &FilterCriteria,
    ) -> Vec<RenderablePost> {
        let viewer = match self.store.viewer().await {
            Some(viewer) => viewer,
            None => {
                debug!("no active viewer, feed is empty");
                return Vec::new();
            }
        };

        let posts = self.store.posts().await;
        let scoped = scope_filter(&posts, &viewer, kind, self.config.feed.canonical_school_id);
        let mut refined = attribute_filter(&scoped, criteria);
        self.store.apply_overrides(viewer.user_id, &mut refined);
        present(&refined, &self.config.api.base_url)
    }

    /// Toggle the current viewer's like on a post
    pub async fn toggle_like(&self, post_id: i64) -> LikeResult<LikeOutcome> {
        let viewer = self.store.viewer().await.ok_or(LikeError::NoViewer)?;
        self.likes.toggle_like(post_id, viewer.user_id).await
    }

    /// Install a new viewer context; see [`FeedStore::set_viewer`]
    pub async fn set_viewer(&self, viewer: Option<Viewer>) {
        let generation = self.store.set_viewer(viewer).await;
        debug!(generation, "viewer context updated");
    }
}
