//! Canonical feed state
//!
//! One explicitly constructed store per app session, passed to the services
//! that need it. Owns the canonical post collection, the per-user like
//! overrides, and the active viewer. Filters read snapshots and build new
//! sequences; only the like engine writes post fields, and only the like
//! fields of the post acted on.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::RwLock;
use tracing::info;

use crate::models::{Post, Viewer};

/// Lifecycle of a per-user like override
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikePhase {
    /// Optimistic, toggle request still in flight
    Pending,
    /// Confirmed by the server
    Committed,
}

/// Viewer-scoped override of a post's liked flag. Absence of an entry means
/// the post's server-reported value stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeOverride {
    pub liked: bool,
    pub phase: LikePhase,
}

pub struct FeedStore {
    posts: RwLock<Vec<Post>>,
    /// Keyed by (user_id, post_id)
    overrides: DashMap<(i64, i64), LikeOverride>,
    viewer: RwLock<Option<Viewer>>,
    /// Bumped on every viewer change; refreshes check it to detect that
    /// their fetch went stale mid-flight
    generation: AtomicU64,
}

impl FeedStore {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Vec::new()),
            overrides: DashMap::new(),
            viewer: RwLock::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Replace the canonical post collection
    pub async fn install_posts(&self, posts: Vec<Post>) {
        let mut slot = self.posts.write().await;
        *slot = posts;
    }

    /// Snapshot of the canonical posts
    pub async fn posts(&self) -> Vec<Post> {
        self.posts.read().await.clone()
    }

    /// Current canonical (liked, count) pair of a post
    pub async fn like_snapshot(&self, post_id: i64) -> Option<(bool, u32)> {
        self.posts
            .read()
            .await
            .iter()
            .find(|post| post.id == post_id)
            .map(|post| (post.is_liked_by_user, post.likes_count))
    }

    /// Write a post's like fields; returns false when the post is not loaded
    pub async fn update_like_fields(&self, post_id: i64, liked: bool, likes_count: u32) -> bool {
        let mut posts = self.posts.write().await;
        match posts.iter_mut().find(|post| post.id == post_id) {
            Some(post) => {
                post.is_liked_by_user = liked;
                post.likes_count = likes_count;
                true
            }
            None => false,
        }
    }

    pub async fn viewer(&self) -> Option<Viewer> {
        self.viewer.read().await.clone()
    }

    /// Whether the active viewer is signed in as this user
    pub async fn viewer_is(&self, user_id: i64) -> bool {
        self.viewer
            .read()
            .await
            .as_ref()
            .map_or(false, |viewer| viewer.user_id == user_id)
    }

    /// Install a new viewer context.
    ///
    /// Any change bumps the generation so in-flight refreshes can detect they
    /// went stale. A change of the viewing user additionally discards every
    /// like override recorded for the previous user; optimistic state never
    /// leaks across identities.
    pub async fn set_viewer(&self, next: Option<Viewer>) -> u64 {
        let mut slot = self.viewer.write().await;
        if *slot == next {
            return self.generation.load(Ordering::SeqCst);
        }

        let prior_user = slot.as_ref().map(|viewer| viewer.user_id);
        let next_user = next.as_ref().map(|viewer| viewer.user_id);
        if prior_user != next_user {
            if let Some(user_id) = prior_user {
                let dropped = self.discard_overrides_for(user_id);
                info!(user_id, dropped, "viewer switched, like overrides discarded");
            }
        }

        *slot = next;
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn override_for(&self, user_id: i64, post_id: i64) -> Option<LikeOverride> {
        self.overrides
            .get(&(user_id, post_id))
            .map(|entry| *entry.value())
    }

    pub fn set_override(&self, user_id: i64, post_id: i64, like_override: LikeOverride) {
        self.overrides.insert((user_id, post_id), like_override);
    }

    /// Put back whatever override state existed before an optimistic write
    pub fn restore_override(&self, user_id: i64, post_id: i64, prior: Option<LikeOverride>) {
        match prior {
            Some(like_override) => {
                self.overrides.insert((user_id, post_id), like_override);
            }
            None => {
                self.overrides.remove(&(user_id, post_id));
            }
        }
    }

    /// Overlay a user's like overrides onto a derived post sequence
    pub fn apply_overrides(&self, user_id: i64, posts: &mut [Post]) {
        for post in posts.iter_mut() {
            if let Some(like_override) = self.override_for(user_id, post.id) {
                post.is_liked_by_user = like_override.liked;
            }
        }
    }

    fn discard_overrides_for(&self, user_id: i64) -> usize {
        let mut dropped = 0;
        self.overrides.retain(|(owner, _), _| {
            if *owner == user_id {
                dropped += 1;
                false
            } else {
                true
            }
        });
        dropped
    }
}

impl Default for FeedStore {
    fn default() -> Self {
        Self::new()
    }
}
