//! Error types for the feed engine
//!
//! Fetch failures block list rendering and carry up to the caller for a
//! retry affordance. Like failures stay inside the reconciliation engine:
//! the optimistic state is rolled back and the error is reported to the
//! caller for an optional non-blocking notice, never as a feed failure.

use thiserror::Error;

use classloop_api_client::ApiError;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to load the activity feed: {0}")]
    Api(#[from] ApiError),
}

#[derive(Error, Debug)]
pub enum LikeError {
    #[error("like toggle failed: {0}")]
    Api(#[from] ApiError),
    /// A toggle for this post is already in flight
    #[error("a like toggle for post {post_id} is already in flight")]
    ToggleInFlight { post_id: i64 },
    #[error("post {post_id} is not in the loaded feed")]
    UnknownPost { post_id: i64 },
    #[error("no viewer session is active")]
    NoViewer,
}

pub type FetchResult<T> = Result<T, FetchError>;
pub type LikeResult<T> = Result<T, LikeError>;
