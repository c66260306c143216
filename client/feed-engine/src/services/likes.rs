//! Optimistic like reconciliation
//!
//! A toggle flips the liked flag and adjusts the count locally before the
//! network call resolves, so the change is visible immediately. The server
//! response then reconciles: on success its values overwrite the optimistic
//! guess (the server is authoritative, counts may differ when another client
//! acted concurrently); on failure the exact pre-optimistic snapshot is
//! restored, never the logical inverse of the guess.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, warn};

use classloop_api_client::{LikeAction, SchoolApi, ToggleLikeRequest};

use crate::error::{LikeError, LikeResult};
use crate::models::LikeOutcome;
use crate::store::{FeedStore, LikeOverride, LikePhase};

pub struct LikeEngine {
    api: Arc<dyn SchoolApi>,
    store: Arc<FeedStore>,
    /// Legacy mode: skip the per-post in-flight guard and let overlapping
    /// toggles on one post race
    allow_concurrent_toggles: bool,
    in_flight: DashMap<i64, ()>,
}

impl LikeEngine {
    pub fn new(
        api: Arc<dyn SchoolApi>,
        store: Arc<FeedStore>,
        allow_concurrent_toggles: bool,
    ) -> Self {
        Self {
            api,
            store,
            allow_concurrent_toggles,
            in_flight: DashMap::new(),
        }
    }

    /// Toggle the viewer's like on a post.
    ///
    /// The optimistic flip is applied synchronously before the request is
    /// sent; at most one toggle per post may be outstanding unless the
    /// engine was built with `allow_concurrent_toggles`. A response that
    /// resolves after the signing user changed leaves the store untouched,
    /// on the commit and the rollback path alike: the old session's state
    /// never reaches the new one.
    pub async fn toggle_like(&self, post_id: i64, user_id: i64) -> LikeResult<LikeOutcome> {
        let _slot = if self.allow_concurrent_toggles {
            None
        } else {
            Some(self.claim(post_id)?)
        };

        // Snapshot everything needed for an exact rollback before touching
        // any state.
        let (server_liked, original_count) = self
            .store
            .like_snapshot(post_id)
            .await
            .ok_or(LikeError::UnknownPost { post_id })?;
        let prior_override = self.store.override_for(user_id, post_id);
        let was_liked = prior_override
            .map(|entry| entry.liked)
            .unwrap_or(server_liked);

        // Optimistic flip, visible to presentation before the call resolves.
        let optimistic_count = if was_liked {
            original_count.saturating_sub(1)
        } else {
            original_count.saturating_add(1)
        };
        self.store
            .update_like_fields(post_id, !was_liked, optimistic_count)
            .await;
        self.store.set_override(
            user_id,
            post_id,
            LikeOverride {
                liked: !was_liked,
                phase: LikePhase::Pending,
            },
        );

        let action = if was_liked {
            LikeAction::Unlike
        } else {
            LikeAction::Like
        };
        let request = ToggleLikeRequest { post_id, action };

        match self.api.toggle_like(&request).await {
            Ok(snapshot) => {
                // Resolved after the signing user changed: the result
                // belongs to the old session, the store stays untouched.
                if !self.store.viewer_is(user_id).await {
                    warn!(post_id, user_id, "viewer changed during toggle, late commit dropped");
                    return Ok(LikeOutcome {
                        post_id,
                        action,
                        liked: snapshot.is_liked_by_user,
                        likes_count: snapshot.likes_count,
                    });
                }
                self.store
                    .update_like_fields(post_id, snapshot.is_liked_by_user, snapshot.likes_count)
                    .await;
                self.store.set_override(
                    user_id,
                    post_id,
                    LikeOverride {
                        liked: snapshot.is_liked_by_user,
                        phase: LikePhase::Committed,
                    },
                );
                debug!(
                    post_id,
                    liked = snapshot.is_liked_by_user,
                    count = snapshot.likes_count,
                    "like toggle committed"
                );
                Ok(LikeOutcome {
                    post_id,
                    action,
                    liked: snapshot.is_liked_by_user,
                    likes_count: snapshot.likes_count,
                })
            }
            Err(err) => {
                if self.store.viewer_is(user_id).await {
                    self.store
                        .update_like_fields(post_id, server_liked, original_count)
                        .await;
                    self.store.restore_override(user_id, post_id, prior_override);
                    warn!(post_id, error = %err, "like toggle failed, rolled back");
                } else {
                    // The rollback snapshot also belongs to the old session.
                    warn!(
                        post_id,
                        user_id,
                        error = %err,
                        "like toggle failed after user switch, rollback dropped"
                    );
                }
                Err(err.into())
            }
        }
    }

    fn claim(&self, post_id: i64) -> LikeResult<InFlightSlot<'_>> {
        match self.in_flight.entry(post_id) {
            Entry::Occupied(_) => Err(LikeError::ToggleInFlight { post_id }),
            Entry::Vacant(slot) => {
                slot.insert(());
                Ok(InFlightSlot {
                    map: &self.in_flight,
                    post_id,
                })
            }
        }
    }
}

/// Holds a post's in-flight slot; releases it on drop so every return path
/// frees the post for the next toggle.
struct InFlightSlot<'a> {
    map: &'a DashMap<i64, ()>,
    post_id: i64,
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        self.map.remove(&self.post_id);
    }
}
